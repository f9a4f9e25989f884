//! Error types for the analysis pipeline.

use std::time::Duration;

/// Input rejected before any scoring work happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("text is empty")]
    Empty,

    #[error("text is too short: {len} characters, minimum is {min}")]
    TooShort { len: usize, min: usize },

    #[error("text is too long: {len} characters, maximum is {max}")]
    TooLong { len: usize, max: usize },

    #[error("text contains disallowed content: {pattern}")]
    HarmfulContent { pattern: String },
}

/// Errors surfaced by `ScandalScope` entry points.
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Quota for the current window is used up.
    #[error("rate limited: retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("analysis failed: {reason}")]
    Analysis { reason: String },
}

impl From<ClassifierError> for ScopeError {
    fn from(e: ClassifierError) -> Self {
        ScopeError::Analysis {
            reason: e.to_string(),
        }
    }
}

/// Errors from a remote classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("{provider} is not configured: {reason}")]
    NotConfigured { provider: String, reason: String },

    #[error("{provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("{provider} returned an invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Errors from LLM-backed generation. Always recovered by template fallback.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },

    #[error("response contained no content")]
    EmptyContent,
}

pub type Result<T> = std::result::Result<T, ScopeError>;
