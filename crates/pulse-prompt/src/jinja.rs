//! MiniJinja-backed templates
//!
//! Bodies are checked for syntax when the template is built and rendered
//! against one shared environment.

use crate::{Language, PromptError, PromptTemplate, Result};
use minijinja::Environment;
use minijinja::value::Value as JinjaValue;
use serde_json::Value;
use std::sync::LazyLock;

/// Environment shared by every template
///
/// Block tags swallow their own line (`trim_blocks` and `lstrip_blocks`).
/// Besides the builtins there is `percent`: `0.1234 | percent` is `12.34%`.
static ENVIRONMENT: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("percent", |v: f64| format!("{:.2}%", v * 100.0));
    env
});

/// A named template with Jinja bodies per language
///
/// ```
/// use pulse_prompt::{JinjaTemplate, Language, PromptTemplate};
/// use serde_json::json;
///
/// let t = JinjaTemplate::bilingual(
///     "latest",
///     "- Latest return: {{ r | percent }}",
///     "- 直近1日のリターン: {{ r | percent }}",
/// ).unwrap();
///
/// let text = t.render(Language::Japanese, &json!({ "r": 0.0125 })).unwrap();
/// assert_eq!(text, "- 直近1日のリターン: 1.25%");
/// ```
#[derive(Debug, Clone)]
pub struct JinjaTemplate {
    name: String,
    bodies: Vec<(Language, String)>,
}

impl JinjaTemplate {
    pub fn builder(name: impl Into<String>) -> JinjaTemplateBuilder {
        JinjaTemplateBuilder {
            name: name.into(),
            bodies: Vec::new(),
        }
    }

    /// English-only template
    pub fn new(name: impl Into<String>, english: impl Into<String>) -> Result<Self> {
        Self::builder(name).english(english).build()
    }

    pub fn bilingual(
        name: impl Into<String>,
        english: impl Into<String>,
        japanese: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(name).english(english).japanese(japanese).build()
    }

    fn body(&self, lang: Language) -> Option<&str> {
        self.bodies
            .iter()
            .find(|(l, _)| *l == lang)
            .map(|(_, body)| body.as_str())
    }
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn languages(&self) -> Vec<Language> {
        self.bodies.iter().map(|(l, _)| *l).collect()
    }

    fn render(&self, lang: Language, vars: &Value) -> Result<String> {
        let body = self.body(lang).ok_or_else(|| PromptError::MissingLanguage {
            template: self.name.clone(),
            language: lang,
        })?;

        ENVIRONMENT
            .render_str(body, JinjaValue::from_serialize(vars))
            .map_err(|source| PromptError::Render {
                template: self.name.clone(),
                source,
            })
    }
}

/// Builder for [`JinjaTemplate`]
#[derive(Debug)]
pub struct JinjaTemplateBuilder {
    name: String,
    bodies: Vec<(Language, String)>,
}

impl JinjaTemplateBuilder {
    /// Set the body for `lang`, replacing an earlier one
    pub fn body(mut self, lang: Language, body: impl Into<String>) -> Self {
        let body = body.into();
        match self.bodies.iter_mut().find(|(l, _)| *l == lang) {
            Some(slot) => slot.1 = body,
            None => self.bodies.push((lang, body)),
        }
        self
    }

    pub fn english(self, body: impl Into<String>) -> Self {
        self.body(Language::English, body)
    }

    pub fn japanese(self, body: impl Into<String>) -> Self {
        self.body(Language::Japanese, body)
    }

    /// Check every body for syntax errors
    ///
    /// Undefined variables only surface at render time.
    pub fn build(self) -> Result<JinjaTemplate> {
        if self.bodies.is_empty() {
            return Err(PromptError::Empty(self.name));
        }

        for (lang, body) in &self.bodies {
            ENVIRONMENT
                .template_from_str(body)
                .map_err(|source| PromptError::Syntax {
                    template: self.name.clone(),
                    language: *lang,
                    source,
                })?;
        }

        Ok(JinjaTemplate {
            name: self.name,
            bodies: self.bodies,
        })
    }
}
