//! Core template trait

use crate::{Language, PromptError, Result};
use serde_json::Value;

/// A named template with one body per language
///
/// Variables travel as `serde_json::Value`, which keeps the trait
/// dyn-compatible.
pub trait PromptTemplate: Send + Sync {
    fn name(&self) -> &str;

    /// Languages with a body, in declaration order
    fn languages(&self) -> Vec<Language>;

    /// Render the body for exactly `lang`
    fn render(&self, lang: Language, vars: &Value) -> Result<String>;

    fn supports_language(&self, lang: Language) -> bool {
        self.languages().contains(&lang)
    }

    /// Language actually used for a request: `requested`, else English, else
    /// the first declared body
    fn resolve_language(&self, requested: Language) -> Option<Language> {
        let languages = self.languages();
        [requested, Language::English]
            .into_iter()
            .find(|l| languages.contains(l))
            .or_else(|| languages.first().copied())
    }

    /// Render in the resolved language
    fn render_localized(&self, requested: Language, vars: &Value) -> Result<String> {
        let lang = self
            .resolve_language(requested)
            .ok_or_else(|| PromptError::Empty(self.name().to_string()))?;
        self.render(lang, vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Fixed text per language
    struct Fixed(Vec<(Language, &'static str)>);

    impl PromptTemplate for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn languages(&self) -> Vec<Language> {
            self.0.iter().map(|(l, _)| *l).collect()
        }

        fn render(&self, lang: Language, _vars: &Value) -> Result<String> {
            self.0
                .iter()
                .find(|(l, _)| *l == lang)
                .map(|(_, body)| (*body).to_string())
                .ok_or(PromptError::MissingLanguage {
                    template: "fixed".to_string(),
                    language: lang,
                })
        }
    }

    #[test]
    fn test_requested_language_wins() {
        let t = Fixed(vec![
            (Language::English, "## Business summary"),
            (Language::Japanese, "## 事業内容"),
        ]);
        assert_eq!(t.render_localized(Language::Japanese, &json!({})).unwrap(), "## 事業内容");
    }

    #[test]
    fn test_english_fallback() {
        let t = Fixed(vec![(Language::English, "## Business summary")]);
        assert_eq!(t.resolve_language(Language::Japanese), Some(Language::English));
        assert!(t.render(Language::Japanese, &json!({})).is_err());
    }

    #[test]
    fn test_first_body_fallback() {
        let t = Fixed(vec![(Language::Japanese, "## 事業内容")]);
        assert_eq!(t.render_localized(Language::English, &json!({})).unwrap(), "## 事業内容");
    }

    #[test]
    fn test_no_bodies() {
        let t = Fixed(Vec::new());
        assert!(!t.supports_language(Language::English));
        assert!(matches!(
            t.render_localized(Language::English, &json!({})),
            Err(PromptError::Empty(_))
        ));
    }
}
