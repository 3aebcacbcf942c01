//! Error types for LLM calls

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("No API key configured ({0})")]
    MissingApiKey(&'static str),

    /// Key rejected by the service
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Unknown model '{0}'")]
    UnknownModel(String),

    /// Any other non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The prompt or the answer was withheld by safety filters
    #[error("Response blocked: {0}")]
    Blocked(String),

    /// The call succeeded but produced no text
    #[error("Empty completion")]
    EmptyCompletion,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LLMError {
    /// Whether repeating the same call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            LLMError::RateLimited(_) => true,
            LLMError::Status { status, .. } => *status >= 500,
            #[cfg(feature = "gemini")]
            LLMError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
