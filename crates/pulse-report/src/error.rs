//! Error types for report generation

use thiserror::Error;

/// Missing or invalid configuration, detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty
    #[error("Required environment variable {0} is not set")]
    MissingEnv(String),

    /// A value failed validation
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Report pipeline errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// External API answered with an error
    #[error("{provider} API error: {detail}")]
    ApiError { provider: String, detail: String },

    /// Yahoo Finance price feed error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Index membership page could not be parsed
    #[error("Membership parse error: {0}")]
    MembershipParse(String),

    /// Rate limit still exceeded after retries
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Summarization service error
    #[error("LLM error: {0}")]
    Llm(#[from] pulse_llm::LLMError),

    /// Template error
    #[error("Prompt error: {0}")]
    Prompt(#[from] pulse_prompt::PromptError),
}

impl ReportError {
    /// Shorthand for [`ReportError::ApiError`]
    pub fn api(provider: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ApiError {
            provider: provider.into(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
