//! Report languages

use crate::PromptError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language a report is written in
///
/// ```
/// use pulse_prompt::Language;
///
/// assert_eq!("ja".parse::<Language>().unwrap(), Language::Japanese);
/// assert_eq!(Language::English.code(), "en");
/// assert!("de".parse::<Language>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "en")]
    English,
    #[serde(alias = "ja")]
    Japanese,
}

impl Language {
    /// Every supported language, English first
    pub const ALL: [Language; 2] = [Language::English, Language::Japanese];

    /// ISO 639-1 code
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Japanese => "ja",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::English => "English",
            Language::Japanese => "Japanese",
        })
    }
}

/// Accepts the ISO code, the English name or the native name, any case
impl FromStr for Language {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Language::English),
            "ja" | "ja-jp" | "jp" | "japanese" | "日本語" => Ok(Language::Japanese),
            _ => Err(PromptError::UnsupportedLanguage(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_aliases() {
        for input in ["en", " EN ", "English", "en-US"] {
            assert_eq!(input.parse::<Language>().unwrap(), Language::English);
        }
        for input in ["ja", "JP", "japanese", "日本語"] {
            assert_eq!(input.parse::<Language>().unwrap(), Language::Japanese);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert!(matches!(err, PromptError::UnsupportedLanguage(code) if code == "fr"));
    }

    #[test]
    fn test_display_and_code() {
        assert_eq!(Language::Japanese.to_string(), "Japanese");
        assert_eq!(Language::Japanese.code(), "ja");
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&Language::Japanese).unwrap(),
            "\"japanese\""
        );
        let parsed: Language = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(parsed, Language::Japanese);
    }
}
