//! Prompt and report templates for market-pulse
//!
//! Every message the job posts and every prompt it sends to the summarization
//! service is rendered from a named template. Templates carry one body per
//! language and use Jinja2 syntax (`{{ variable }}`) for interpolation.
//!
//! # Quick Start
//!
//! ```
//! use pulse_prompt::{JinjaTemplate, Language, PromptRegistry};
//! use serde_json::json;
//!
//! let mut registry = PromptRegistry::new(Language::Japanese);
//! registry.register(
//!     JinjaTemplate::bilingual(
//!         "news_lead",
//!         "Related news for {{ name }}:",
//!         "{{ name }}の関連ニュース:",
//!     )
//!     .unwrap(),
//! );
//!
//! let text = registry.render("news_lead", &json!({ "name": "Apple" })).unwrap();
//! assert_eq!(text, "Appleの関連ニュース:");
//! ```
//!
//! # Using the Builder
//!
//! ```
//! use pulse_prompt::PromptBuilder;
//!
//! let text = PromptBuilder::new()
//!     .line("Top 3 relevant news:")
//!     .newline()
//!     .field("Source", "Reuters")
//!     .build();
//!
//! assert_eq!(text, "Top 3 relevant news:\n\nSource: Reuters\n");
//! ```

mod builder;
mod error;
mod jinja;
mod language;
mod registry;
mod template;

// Re-export core types
pub use builder::PromptBuilder;
pub use error::{PromptError, Result};
pub use jinja::{JinjaTemplate, JinjaTemplateBuilder};
pub use language::Language;
pub use registry::PromptRegistry;
pub use template::PromptTemplate;
