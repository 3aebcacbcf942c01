//! Run configuration
//!
//! Secrets come from the environment (optionally seeded from `.env`); every
//! tunable has a default and can be overridden through the builder.

use crate::error::{ConfigError, Result};
use crate::selection::SelectionStrategy;
use pulse_llm::providers::gemini::DEFAULT_GEMINI_MODEL;
use pulse_prompt::Language;
use pulse_utils::require_var;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DISCORD_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
pub const NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const REPORT_LANGUAGE: &str = "REPORT_LANGUAGE";

/// Pauses after each message of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDelays {
    pub after_overview: Duration,
    pub after_chart: Duration,
    pub after_company: Duration,
    pub after_forecast: Duration,
}

impl Default for PostDelays {
    fn default() -> Self {
        Self {
            after_overview: Duration::from_secs(1),
            after_chart: Duration::from_secs(1),
            after_company: Duration::from_secs(5),
            after_forecast: Duration::from_secs(10),
        }
    }
}

impl PostDelays {
    /// No pauses at all
    pub fn none() -> Self {
        Self {
            after_overview: Duration::ZERO,
            after_chart: Duration::ZERO,
            after_company: Duration::ZERO,
            after_forecast: Duration::ZERO,
        }
    }
}

/// Configuration for one report run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Discord webhook receiving every message
    pub webhook_url: String,

    /// NewsAPI key
    pub news_api_key: String,

    /// Gemini API key
    pub gemini_api_key: String,

    /// How many symbols to report on (per side for the extremal strategy)
    pub sample_size: usize,

    /// How symbols are picked
    pub strategy: SelectionStrategy,

    /// Seed for reproducible random selection
    pub seed: Option<u64>,

    /// Articles per digest section
    pub news_items: usize,

    /// Language of the news articles requested from the feed
    pub news_language: String,

    /// Language of posted messages and prompts
    pub language: Language,

    /// Summarization model
    pub model: String,

    /// Output token cap per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Per-request timeout for HTTP calls
    pub request_timeout: Duration,

    /// Webhook retries on 429
    pub max_retries: u32,

    /// Price downloads per minute
    pub price_rate_limit: u32,

    /// Lifetime of cached fundamentals
    pub fundamentals_cache_ttl: Duration,

    /// Pauses between posts
    pub delays: PostDelays,

    /// Log messages instead of posting them
    pub dry_run: bool,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            news_api_key: String::new(),
            gemini_api_key: String::new(),
            sample_size: 3,
            strategy: SelectionStrategy::Random,
            seed: None,
            news_items: 3,
            news_language: "en".to_string(),
            language: Language::English,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            max_tokens: 2048,
            temperature: None,
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            price_rate_limit: 300,
            fundamentals_cache_ttl: Duration::from_secs(3600),
            delays: PostDelays::default(),
            dry_run: false,
        }
    }
}

impl PulseConfig {
    /// Create a new configuration builder
    pub fn builder() -> PulseConfigBuilder {
        PulseConfigBuilder::default()
    }

    /// Read secrets and the report language from the environment
    ///
    /// A `.env` file is loaded first when one exists.
    pub fn from_env() -> Result<Self> {
        pulse_utils::load_dotenv();
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.dry_run {
            url::Url::parse(&self.webhook_url).map_err(|e| ConfigError::Invalid {
                field: "webhook_url".to_string(),
                reason: e.to_string(),
            })?;
        }

        if self.sample_size == 0 {
            return Err(invalid("sample_size", "must be greater than 0"));
        }

        if self.price_rate_limit == 0 {
            return Err(invalid("price_rate_limit", "must be greater than 0"));
        }

        if self.max_tokens == 0 {
            return Err(invalid("max_tokens", "must be greater than 0"));
        }

        if self.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::error::ReportError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Builder for PulseConfig
#[derive(Debug, Default)]
pub struct PulseConfigBuilder {
    webhook_url: Option<String>,
    news_api_key: Option<String>,
    gemini_api_key: Option<String>,
    sample_size: Option<usize>,
    strategy: Option<SelectionStrategy>,
    seed: Option<u64>,
    news_items: Option<usize>,
    news_language: Option<String>,
    language: Option<Language>,
    model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    price_rate_limit: Option<u32>,
    fundamentals_cache_ttl: Option<Duration>,
    delays: Option<PostDelays>,
    dry_run: bool,
}

impl PulseConfigBuilder {
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    pub fn sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    pub fn strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn news_items(mut self, n: usize) -> Self {
        self.news_items = Some(n);
        self
    }

    pub fn news_language(mut self, code: impl Into<String>) -> Self {
        self.news_language = Some(code.into());
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn price_rate_limit(mut self, per_minute: u32) -> Self {
        self.price_rate_limit = Some(per_minute);
        self
    }

    pub fn fundamentals_cache_ttl(mut self, ttl: Duration) -> Self {
        self.fundamentals_cache_ttl = Some(ttl);
        self
    }

    pub fn delays(mut self, delays: PostDelays) -> Self {
        self.delays = Some(delays);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Fill secrets and the report language from the environment
    ///
    /// Values already set on the builder are kept.
    pub fn with_env(mut self) -> Result<Self> {
        if self.webhook_url.is_none() {
            self.webhook_url = Some(require_var(DISCORD_WEBHOOK_URL).map_err(ConfigError::MissingEnv)?);
        }

        if self.news_api_key.is_none() {
            self.news_api_key = Some(require_var(NEWS_API_KEY).map_err(ConfigError::MissingEnv)?);
        }

        if self.gemini_api_key.is_none() {
            let key = require_var(GEMINI_API_KEY)
                .or_else(|_| require_var(GOOGLE_API_KEY))
                .map_err(|_| ConfigError::MissingEnv(GEMINI_API_KEY.to_string()))?;
            self.gemini_api_key = Some(key);
        }

        if self.language.is_none() {
            if let Ok(code) = std::env::var(REPORT_LANGUAGE) {
                let language = code.parse::<Language>().map_err(|e| ConfigError::Invalid {
                    field: REPORT_LANGUAGE.to_string(),
                    reason: e.to_string(),
                })?;
                self.language = Some(language);
            }
        }

        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<PulseConfig> {
        let defaults = PulseConfig::default();

        let config = PulseConfig {
            webhook_url: self.webhook_url.unwrap_or(defaults.webhook_url),
            news_api_key: self.news_api_key.unwrap_or(defaults.news_api_key),
            gemini_api_key: self.gemini_api_key.unwrap_or(defaults.gemini_api_key),
            sample_size: self.sample_size.unwrap_or(defaults.sample_size),
            strategy: self.strategy.unwrap_or(defaults.strategy),
            seed: self.seed.or(defaults.seed),
            news_items: self.news_items.unwrap_or(defaults.news_items),
            news_language: self.news_language.unwrap_or(defaults.news_language),
            language: self.language.unwrap_or(defaults.language),
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.or(defaults.temperature),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            price_rate_limit: self.price_rate_limit.unwrap_or(defaults.price_rate_limit),
            fundamentals_cache_ttl: self
                .fundamentals_cache_ttl
                .unwrap_or(defaults.fundamentals_cache_ttl),
            delays: self.delays.unwrap_or(defaults.delays),
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;

    const WEBHOOK: &str = "https://discord.com/api/webhooks/1/abc";

    #[test]
    fn test_default_config() {
        let config = PulseConfig::default();
        assert_eq!(config.sample_size, 3);
        assert_eq!(config.news_items, 3);
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.delays.after_forecast, Duration::from_secs(10));
        assert_eq!(config.language, Language::English);
    }

    #[test]
    fn test_config_builder() {
        let config = PulseConfig::builder()
            .webhook_url(WEBHOOK)
            .news_api_key("news")
            .gemini_api_key("gemini")
            .sample_size(5)
            .strategy(SelectionStrategy::Extremal)
            .language(Language::Japanese)
            .delays(PostDelays::none())
            .build()
            .unwrap();

        assert_eq!(config.sample_size, 5);
        assert_eq!(config.strategy, SelectionStrategy::Extremal);
        assert_eq!(config.language, Language::Japanese);
        assert_eq!(config.delays.after_company, Duration::ZERO);
    }

    #[test]
    fn test_invalid_webhook_url() {
        let result = PulseConfig::builder().webhook_url("not a url").build();
        assert!(matches!(
            result,
            Err(ReportError::Config(ConfigError::Invalid { .. }))
        ));
    }

    #[test]
    fn test_dry_run_skips_webhook_check() {
        let config = PulseConfig::builder().dry_run(true).build().unwrap();
        assert!(config.dry_run);
    }

    #[test]
    fn test_zero_sample_size_rejected() {
        let result = PulseConfig::builder()
            .webhook_url(WEBHOOK)
            .sample_size(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_with_env_keeps_explicit_values() {
        let builder = PulseConfig::builder()
            .webhook_url(WEBHOOK)
            .news_api_key("news")
            .gemini_api_key("gemini")
            .language(Language::Japanese)
            .with_env()
            .unwrap();

        let config = builder.build().unwrap();
        assert_eq!(config.news_api_key, "news");
        assert_eq!(config.language, Language::Japanese);
    }

    #[test]
    fn test_missing_env_is_typed() {
        // SAFETY: no other test in this crate sets NEWS_API_KEY
        unsafe { std::env::remove_var("NEWS_API_KEY") };

        let result = PulseConfig::builder()
            .webhook_url(WEBHOOK)
            .with_env();

        match result {
            Err(ReportError::Config(ConfigError::MissingEnv(name))) => {
                assert_eq!(name, NEWS_API_KEY);
            }
            other => panic!("expected MissingEnv, got {other:?}"),
        }
    }
}
