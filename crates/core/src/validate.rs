use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy)]
pub struct LengthLimits {
    pub min: usize,
    pub max: usize,
}

static HARMFUL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "self-harm encouragement",
            Regex::new(r"(?i)\b(kill|hurt|harm)\s+(yo)?urself\b").expect("valid regex"),
        ),
        (
            "personal identifier",
            Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("valid regex"),
        ),
        (
            "embedded script",
            Regex::new(r"(?i)<\s*script\b").expect("valid regex"),
        ),
    ]
});

/// Returns the trimmed text when it is acceptable for analysis.
pub fn validate(text: &str, limits: LengthLimits) -> Result<&str, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let len = trimmed.chars().count();
    if len < limits.min {
        return Err(ValidationError::TooShort {
            len,
            min: limits.min,
        });
    }
    if len > limits.max {
        return Err(ValidationError::TooLong {
            len,
            max: limits.max,
        });
    }

    if let Some((name, _)) = HARMFUL_PATTERNS.iter().find(|(_, re)| re.is_match(trimmed)) {
        return Err(ValidationError::HarmfulContent {
            pattern: name.to_string(),
        });
    }

    Ok(trimmed)
}
