//! Static text tables used when no LLM is available.

use crate::types::{RiskLevel, RoastMode};

pub const NO_APOLOGY_NEEDED: &str =
    "No apology needed. This take is about as controversial as a glass of water.";

pub fn roasts(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Safe => &[
            "This is so vanilla it comes with a free side of plain toast.",
            "Wholesome to the point of being suspicious. Are you a golden retriever?",
            "Congratulations, you have achieved peak vanilla. The internet will yawn and scroll on.",
            "So wholesome your grandma would print it out and put it on the fridge.",
        ],
        RiskLevel::Mild => &[
            "Spicy like mayonnaise. A few people might raise an eyebrow, mostly out of boredom.",
            "You're dipping a toe in controversy and immediately complaining the water is cold.",
            "This might earn you a passive-aggressive reply from your cousin. Nothing more.",
            "Mildly hot take, served lukewarm.",
        ],
        RiskLevel::Moderate => &[
            "You've wandered into the comment section danger zone. Bring snacks.",
            "This is the kind of post that gets screenshotted 'for later'.",
            "Not cancelled yet, but the group chat is definitely talking about you.",
            "Moderately spicy. Someone is already drafting a quote-tweet.",
        ],
        RiskLevel::High => &[
            "Your PR team just felt a disturbance in the force.",
            "This is trending material, and not the good kind.",
            "You're one retweet away from a notes-app apology.",
            "Bold of you to post this with your real name attached.",
        ],
        RiskLevel::Extreme => &[
            "Congratulations, you just wrote your own cancellation announcement.",
            "This is not a hot take, it's a career-ending wildfire.",
            "Delete this, then delete your account, then move to a remote island.",
            "Even the internet's worst corners are asking you to calm down.",
            "Your future self is already typing the apology video script.",
        ],
    }
}

/// Apology templates. SAFE and MILD fall back to [`NO_APOLOGY_NEEDED`].
pub fn apologies(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Safe | RiskLevel::Mild => &[],
        RiskLevel::Moderate => &[
            "I realize my recent post came across differently than I intended. I'm listening and learning.",
            "Looking back, I could have worded that better. Thank you to everyone who shared their perspective.",
            "I hear the feedback on my comment and I'm taking time to reflect on it.",
        ],
        RiskLevel::High => &[
            "I want to sincerely apologize for my words. They were hurtful, and I take full responsibility.",
            "What I said was wrong. I'm sorry to everyone I hurt, and I'm committed to doing better.",
            "I made a serious mistake with that post. There's no excuse, and I'm truly sorry.",
        ],
        RiskLevel::Extreme => &[
            "I am deeply sorry. My words were unacceptable and caused real harm. I'm stepping back to reflect and educate myself.",
            "There is no justification for what I wrote. I apologize unreservedly and will be taking a break from social media.",
            "I failed to live up to the standards I should hold myself to. I'm sorry, and I'll be working to make amends.",
        ],
    }
}

pub fn mode_roasts(mode: RoastMode) -> &'static [&'static str] {
    match mode {
        RoastMode::Genz => &[
            "Bestie, this take is giving main character energy with zero plot. No cap.",
            "It's the confidence for me. Respectfully, this ain't it chief.",
            "Lowkey this is mid and highkey everyone can tell.",
        ],
        RoastMode::Hr => &[
            "Per our previous conversations, this statement has been flagged for a follow-up meeting.",
            "We value your enthusiasm. Please review section 4.2 of the communication guidelines.",
            "Thank you for sharing. Let's circle back once you've completed the sensitivity training module.",
        ],
        RoastMode::Therapist => &[
            "And how does saying that make you feel? Let's unpack why you needed the world to hear it.",
            "I'm noticing a pattern here. Let's sit with that for a moment.",
            "It sounds like there's a lot going on beneath the surface of this post.",
        ],
        RoastMode::Savage => &[
            "This take is so cold it needs its own weather warning.",
            "I've seen better arguments on the back of a cereal box.",
            "You typed this, read it back, and still hit post. Legendary.",
        ],
        RoastMode::Friendly => &[
            "Aw, you tried! Maybe sleep on this one before sharing it with the world.",
            "I love the energy, but maybe dial it down a notch or two.",
            "Points for honesty! Maybe a few less points for the delivery.",
        ],
    }
}
