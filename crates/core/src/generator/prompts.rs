use crate::types::{Personality, RiskLevel, RoastMode};

use super::chat::{ChatMessage, ChatRequest};

const APOLOGY_TEMPERATURE: f32 = 0.7;
const APOLOGY_MAX_TOKENS: u32 = 200;

fn personality_style(personality: Personality) -> (&'static str, f32, u32) {
    match personality {
        Personality::Sarcastic => (
            "You are a sarcastic comedian. Roast with dry irony and an eye-roll in every sentence.",
            0.8,
            150,
        ),
        Personality::Witty => (
            "You are a quick-witted comedy writer. Roast with clever wordplay and sharp observations.",
            0.9,
            150,
        ),
        Personality::Brutal => (
            "You are a brutally honest roast comic. Be merciless about the take, never about identity.",
            1.0,
            200,
        ),
        Personality::Friendly => (
            "You are a kind friend who teases gently. Keep the roast light and encouraging.",
            0.7,
            150,
        ),
    }
}

fn mode_style(mode: RoastMode) -> (&'static str, f32, u32) {
    match mode {
        RoastMode::Genz => (
            "You roast like a Gen Z internet native: slang, lowercase energy, no cap.",
            0.9,
            150,
        ),
        RoastMode::Hr => (
            "You are a corporate HR representative delivering feedback in painfully polite office jargon.",
            0.5,
            200,
        ),
        RoastMode::Therapist => (
            "You are a calm therapist gently analyzing why the person felt the need to say this.",
            0.6,
            200,
        ),
        RoastMode::Savage => (
            "You are a savage roast battle champion. Be ruthless about the take, never hateful.",
            1.0,
            150,
        ),
        RoastMode::Friendly => (
            "You are a supportive friend who pokes fun with warmth.",
            0.7,
            150,
        ),
    }
}

pub fn roast_request(text: &str, level: RiskLevel, personality: Personality) -> ChatRequest {
    let (system, temperature, max_tokens) = personality_style(personality);
    ChatRequest {
        messages: vec![
            ChatMessage::system(system),
            ChatMessage::user(format!(
                "This statement was rated {} on a cancel-risk scale. \
                 Write a short, funny roast of it in two sentences or fewer.\n\nStatement: \"{}\"",
                level, text
            )),
        ],
        temperature,
        max_tokens,
    }
}

pub fn apology_request(text: &str, level: RiskLevel, personality: Personality) -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage::system(format!(
                "You write public apologies in the voice of someone who posted something {}. \
                 Keep the tone {} but sincere.",
                level,
                personality.as_str()
            )),
            ChatMessage::user(format!(
                "Write a brief public apology (three sentences at most) for posting: \"{}\"",
                text
            )),
        ],
        temperature: APOLOGY_TEMPERATURE,
        max_tokens: APOLOGY_MAX_TOKENS,
    }
}

pub fn mode_request(text: &str, mode: RoastMode) -> ChatRequest {
    let (system, temperature, max_tokens) = mode_style(mode);
    ChatRequest {
        messages: vec![
            ChatMessage::system(system),
            ChatMessage::user(format!(
                "Roast this in your style, in two or three sentences: \"{}\"",
                text
            )),
        ],
        temperature,
        max_tokens,
    }
}
