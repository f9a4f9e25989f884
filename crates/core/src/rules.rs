use crate::types::{AnalysisCategories, RiskLevel};

pub const TOXICITY_ADVICE: &str =
    "Consider rephrasing to reduce the overall hostility of your message.";
pub const INSULT_ADVICE: &str = "Avoid personal attacks. Critique ideas rather than people.";
pub const PROFANITY_ADVICE: &str =
    "Remove or tone down the profanity to keep your audience listening.";
pub const IDENTITY_ADVICE: &str =
    "Steer clear of language that targets people for who they are.";
pub const PAUSE_ADVICE: &str = "Take a moment before posting. This could attract serious backlash.";
pub const REVIEW_ADVICE: &str =
    "Ask someone you trust to read this before it goes public.";
pub const LOOKS_GOOD: &str = "Looks good! Your message seems unlikely to stir up controversy.";

/// Advice strings in rule-evaluation order. Never empty.
pub fn recommend(categories: &AnalysisCategories, risk_level: RiskLevel) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();

    if categories.toxicity > 50.0 {
        recs.push(TOXICITY_ADVICE.to_string());
    }
    if categories.insult > 40.0 {
        recs.push(INSULT_ADVICE.to_string());
    }
    if categories.profanity > 30.0 {
        recs.push(PROFANITY_ADVICE.to_string());
    }
    if categories.identity_attack > 30.0 {
        recs.push(IDENTITY_ADVICE.to_string());
    }

    if risk_level.is_severe() {
        recs.push(PAUSE_ADVICE.to_string());
        recs.push(REVIEW_ADVICE.to_string());
    }

    if recs.is_empty() {
        recs.push(LOOKS_GOOD.to_string());
    }
    recs
}
