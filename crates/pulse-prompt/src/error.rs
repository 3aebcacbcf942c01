//! Error types for template operations

use crate::Language;
use thiserror::Error;

/// Result type for template operations
pub type Result<T> = std::result::Result<T, PromptError>;

#[derive(Error, Debug)]
pub enum PromptError {
    /// No template registered under this name
    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    /// The template has no body in the requested language
    #[error("Template '{template}' has no {language} body")]
    MissingLanguage { template: String, language: Language },

    /// A template was built without any body
    #[error("Template '{0}' has no bodies")]
    Empty(String),

    /// A body is not valid Jinja
    #[error("Template '{template}' ({language}) does not parse: {source}")]
    Syntax {
        template: String,
        language: Language,
        #[source]
        source: minijinja::Error,
    },

    /// Rendering failed, usually on an undefined variable
    #[error("Failed to render '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    /// Language code that is neither English nor Japanese
    #[error("Unsupported language '{0}' (expected en or ja)")]
    UnsupportedLanguage(String),
}
