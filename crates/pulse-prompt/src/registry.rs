//! Named templates rendered in one language

use crate::{Language, PromptError, PromptTemplate, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Every template of a run, bound to the run's language
///
/// Rendering falls back to English (then to the first body) when a template
/// lacks the registry's language.
pub struct PromptRegistry {
    language: Language,
    templates: BTreeMap<String, Box<dyn PromptTemplate>>,
}

impl PromptRegistry {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            templates: BTreeMap::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Add a template; one with the same name is replaced
    pub fn register<T: PromptTemplate + 'static>(&mut self, template: T) -> &mut Self {
        self.templates
            .insert(template.name().to_string(), Box::new(template));
        self
    }

    fn get(&self, name: &str) -> Option<&dyn PromptTemplate> {
        self.templates.get(name).map(|t| &**t)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Render `name` in the registry language
    pub fn render(&self, name: &str, vars: &Value) -> Result<String> {
        self.get(name)
            .ok_or_else(|| PromptError::UnknownTemplate(name.to_string()))?
            .render_localized(self.language, vars)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("language", &self.language)
            .field("templates", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JinjaTemplate;
    use serde_json::json;

    fn heading() -> JinjaTemplate {
        JinjaTemplate::bilingual("heading", "## Business summary", "## 事業内容").unwrap()
    }

    #[test]
    fn test_render_in_registry_language() {
        let mut ja = PromptRegistry::new(Language::Japanese);
        ja.register(heading());
        assert_eq!(ja.render("heading", &json!({})).unwrap(), "## 事業内容");

        let mut en = PromptRegistry::default();
        en.register(heading());
        assert_eq!(en.render("heading", &json!({})).unwrap(), "## Business summary");
    }

    #[test]
    fn test_english_only_template_in_japanese_registry() {
        let mut registry = PromptRegistry::new(Language::Japanese);
        registry.register(JinjaTemplate::new("title", "# {{ symbol }}").unwrap());
        assert_eq!(
            registry.render("title", &json!({ "symbol": "AAPL" })).unwrap(),
            "# AAPL"
        );
    }

    #[test]
    fn test_unknown_template() {
        let registry = PromptRegistry::default();
        assert!(matches!(
            registry.render("nope", &json!({})),
            Err(PromptError::UnknownTemplate(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_register_replaces_and_sorts() {
        let mut registry = PromptRegistry::default();
        registry
            .register(JinjaTemplate::new("b", "old").unwrap())
            .register(JinjaTemplate::new("a", "A").unwrap())
            .register(JinjaTemplate::new("b", "new").unwrap());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(registry.render("b", &json!({})).unwrap(), "new");
        assert!(registry.contains("a"));
    }

    #[test]
    fn test_debug_lists_templates() {
        let mut registry = PromptRegistry::new(Language::Japanese);
        registry.register(heading());
        let debug = format!("{registry:?}");
        assert!(debug.contains("Japanese"));
        assert!(debug.contains("heading"));
    }
}
