use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ClassifierError;
use crate::types::{AnalysisCategories, Category};

use super::{Classification, Classifier, Jitter};

const BASE_SCORE: f64 = 5.0;
const CONTROVERSIAL_POINTS: f64 = 15.0;
const SHOUTING_POINTS: f64 = 15.0;
const EXCLAMATION_POINTS: f64 = 5.0;
const EXCLAMATION_CAP: f64 = 15.0;
const KEYWORD_POINTS: f64 = 20.0;
const KEYWORD_MODIFIER: f64 = 2.0;

const SHOUTING_MIN_LETTERS: usize = 10;
const SHOUTING_UPPER_RATIO: f64 = 0.6;

const CONFIDENCE_BASE: f64 = 0.7;
const CONFIDENCE_PER_HIT: f64 = 0.04;
const CONFIDENCE_CAP: f64 = 0.9;

static RE_CONTROVERSIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(hate|hated|stupid|worst|terrible|awful|everyone|idiots?|dumb|disgusting|pathetic|trash|losers?|garbage|useless|worthless|overrated|cringe)\b",
    )
    .expect("valid regex")
});

static RE_TOXICITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(hate|hated|despise|disgusting|die|kill|destroy)\b").expect("valid regex")
});

static RE_INSULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(stupid|idiots?|morons?|dumb|losers?|pathetic|ugly|clowns?|trash|worthless)\b",
    )
    .expect("valid regex")
});

static RE_PROFANITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(fuck\w*|shit\w*|damn|bitch\w*|ass|asses|asshole\w*|crap|bastards?|hell|wtf)\b",
    )
    .expect("valid regex")
});

static RE_IDENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(women|men|gays?|immigrants?|muslims?|christians?|jews?|boomers?|millennials?|foreigners?)\b",
    )
    .expect("valid regex")
});

static RE_THREAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(kill|murder|hurt|shoot|stab|punch|attack|watch\s+your\s+back)\b")
        .expect("valid regex")
});

static RE_SEXUAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(sex|sexy|nude|naked|porn\w*|horny)\b").expect("valid regex")
});

static RE_FLIRTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(cute|gorgeous|babe|sweetheart|hottie|kiss(es)?|date\s+me|wink)\b")
        .expect("valid regex")
});

static RE_SPAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\b(buy\s+now|click\s+here|free\s+money|subscribe|giveaway|limited\s+offer|promo\s+code)\b|https?://\S+|\bwww\.\S+)",
    )
    .expect("valid regex")
});

static RE_EXCLAMATION_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"!{2,}").expect("valid regex"));

/// Counts of every signal the heuristic looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Signals {
    pub controversial: usize,
    pub toxicity: usize,
    pub insult: usize,
    pub profanity: usize,
    pub identity: usize,
    pub threat: usize,
    pub sexual: usize,
    pub flirtation: usize,
    pub spam: usize,
    pub shouting: bool,
    pub exclamation_runs: usize,
}

impl Signals {
    pub fn extract(text: &str) -> Self {
        let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
        let upper = letters.iter().filter(|c| c.is_uppercase()).count();
        let shouting = letters.len() >= SHOUTING_MIN_LETTERS
            && (upper as f64) / (letters.len() as f64) >= SHOUTING_UPPER_RATIO;

        Self {
            controversial: RE_CONTROVERSIAL.find_iter(text).count(),
            toxicity: RE_TOXICITY.find_iter(text).count(),
            insult: RE_INSULT.find_iter(text).count(),
            profanity: RE_PROFANITY.find_iter(text).count(),
            identity: RE_IDENTITY.find_iter(text).count(),
            threat: RE_THREAT.find_iter(text).count(),
            sexual: RE_SEXUAL.find_iter(text).count(),
            flirtation: RE_FLIRTATION.find_iter(text).count(),
            spam: RE_SPAM.find_iter(text).count(),
            shouting,
            exclamation_runs: RE_EXCLAMATION_RUN.find_iter(text).count(),
        }
    }

    fn hits(&self, category: Category) -> usize {
        match category {
            Category::Toxicity => self.toxicity,
            Category::IdentityAttack => self.identity,
            Category::Insult => self.insult,
            Category::Profanity => self.profanity,
            Category::Threat => self.threat,
            Category::SexuallyExplicit => self.sexual,
            Category::Flirtation => self.flirtation,
            Category::Spam => self.spam,
        }
    }

    fn keyword_hits(&self) -> usize {
        self.controversial + Category::ALL.iter().map(|c| self.hits(*c)).sum::<usize>()
    }

    /// Shared negativity baseline, in `[0, 100]`.
    fn base(&self) -> f64 {
        let mut base = BASE_SCORE + CONTROVERSIAL_POINTS * self.controversial as f64;
        if self.shouting {
            base += SHOUTING_POINTS;
        }
        base += (EXCLAMATION_POINTS * self.exclamation_runs as f64).min(EXCLAMATION_CAP);
        base.min(100.0)
    }
}

/// Portion of the shared baseline each category inherits.
fn base_share(category: Category) -> f64 {
    match category {
        Category::Toxicity => 1.0,
        Category::Insult => 0.8,
        Category::Profanity | Category::IdentityAttack => 0.6,
        Category::Threat => 0.5,
        Category::SexuallyExplicit | Category::Flirtation | Category::Spam => 0.1,
    }
}

/// Keyword and regex rules standing in for a trained classifier.
pub struct HeuristicClassifier {
    jitter: Arc<dyn Jitter>,
}

impl HeuristicClassifier {
    pub fn new(jitter: Arc<dyn Jitter>) -> Self {
        Self { jitter }
    }

    pub fn score(&self, text: &str) -> Classification {
        let signals = Signals::extract(text);
        let base = signals.base();

        let categories = AnalysisCategories::from_fn(|c| {
            let hits = signals.hits(c);
            let modifier = if hits > 0 { KEYWORD_MODIFIER } else { 1.0 };
            (base * base_share(c) + KEYWORD_POINTS * hits as f64) * modifier * self.jitter.factor(c)
        });

        let confidence = (CONFIDENCE_BASE + CONFIDENCE_PER_HIT * signals.keyword_hits() as f64)
            .min(CONFIDENCE_CAP)
            - self.jitter.spread() / 2.0;

        tracing::debug!(?signals, base, "heuristic signals");

        Classification {
            categories,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl Classifier for HeuristicClassifier {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        Ok(self.score(text))
    }
}
