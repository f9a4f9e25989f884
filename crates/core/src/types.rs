use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Safe,
    Mild,
    Moderate,
    High,
    Extreme,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Safe,
        RiskLevel::Mild,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Mild => "MILD",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::Extreme => "EXTREME",
        }
    }

    /// True for the two levels that get the extra cautionary advice.
    pub fn is_severe(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Extreme)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Toxicity,
    IdentityAttack,
    Insult,
    Profanity,
    Threat,
    SexuallyExplicit,
    Flirtation,
    Spam,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Toxicity,
        Category::IdentityAttack,
        Category::Insult,
        Category::Profanity,
        Category::Threat,
        Category::SexuallyExplicit,
        Category::Flirtation,
        Category::Spam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Toxicity => "toxicity",
            Category::IdentityAttack => "identity_attack",
            Category::Insult => "insult",
            Category::Profanity => "profanity",
            Category::Threat => "threat",
            Category::SexuallyExplicit => "sexually_explicit",
            Category::Flirtation => "flirtation",
            Category::Spam => "spam",
        }
    }
}

/// Per-category scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisCategories {
    pub toxicity: f64,
    pub identity_attack: f64,
    pub insult: f64,
    pub profanity: f64,
    pub threat: f64,
    pub sexually_explicit: f64,
    pub flirtation: f64,
    pub spam: f64,
}

impl AnalysisCategories {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Toxicity => self.toxicity,
            Category::IdentityAttack => self.identity_attack,
            Category::Insult => self.insult,
            Category::Profanity => self.profanity,
            Category::Threat => self.threat,
            Category::SexuallyExplicit => self.sexually_explicit,
            Category::Flirtation => self.flirtation,
            Category::Spam => self.spam,
        }
    }

    pub fn set(&mut self, category: Category, value: f64) {
        let slot = match category {
            Category::Toxicity => &mut self.toxicity,
            Category::IdentityAttack => &mut self.identity_attack,
            Category::Insult => &mut self.insult,
            Category::Profanity => &mut self.profanity,
            Category::Threat => &mut self.threat,
            Category::SexuallyExplicit => &mut self.sexually_explicit,
            Category::Flirtation => &mut self.flirtation,
            Category::Spam => &mut self.spam,
        };
        *slot = value;
    }

    /// Build a record by evaluating `f` for every category.
    pub fn from_fn(mut f: impl FnMut(Category) -> f64) -> Self {
        let mut out = Self::default();
        for c in Category::ALL {
            out.set(c, f(c));
        }
        out.clamped()
    }

    /// Clamp every score into `[0, 100]`. NaN becomes 0.
    pub fn clamped(mut self) -> Self {
        for c in Category::ALL {
            let v = self.get(c);
            let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) };
            self.set(c, v);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Personality {
    #[default]
    Sarcastic,
    Witty,
    Brutal,
    Friendly,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Sarcastic => "sarcastic",
            Personality::Witty => "witty",
            Personality::Brutal => "brutal",
            Personality::Friendly => "friendly",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoastMode {
    Genz,
    Hr,
    Therapist,
    Savage,
    Friendly,
}

impl RoastMode {
    pub const ALL: [RoastMode; 5] = [
        RoastMode::Genz,
        RoastMode::Hr,
        RoastMode::Therapist,
        RoastMode::Savage,
        RoastMode::Friendly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoastMode::Genz => "genz",
            RoastMode::Hr => "hr",
            RoastMode::Therapist => "therapist",
            RoastMode::Savage => "savage",
            RoastMode::Friendly => "friendly",
        }
    }
}

/// Where a generated piece of text came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentSource {
    Template,
    Llm,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub text: String,
    pub cancel_score: u8,
    pub risk_level: RiskLevel,
    pub roast: String,
    pub apology: String,
    pub timestamp: DateTime<Utc>,
    pub categories: AnalysisCategories,
    pub recommendations: Vec<String>,
    pub confidence: f64,
    pub processing_time_ms: u64,
    pub version: String,
    pub classifier: String,
    pub content_source: ContentSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoastResult {
    pub id: Uuid,
    pub content: String,
    pub mode: RoastMode,
    pub timestamp: DateTime<Utc>,
    pub original_text: String,
    pub confidence: f64,
    pub tags: Vec<String>,
}
