//! Google Gemini provider
//!
//! Talks to the `generateContent` REST endpoint.
//! See: https://ai.google.dev/api/generate-content
//!
//! ```no_run
//! use pulse_llm::{CompletionRequest, LLMProvider};
//! use pulse_llm::providers::{GeminiConfig, GeminiProvider};
//!
//! # async fn run() -> pulse_llm::Result<()> {
//! let provider = GeminiProvider::with_config(
//!     GeminiConfig::from_env()?.with_timeout(60).with_max_retries(2),
//! )?;
//!
//! let request = CompletionRequest::prompt(
//!     "gemini-1.5-flash",
//!     "Summarize Apple's business in three bullets.",
//! );
//! println!("{}", provider.complete(request).await?.text);
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, FinishReason, LLMError, LLMProvider, Result, Role,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_RETRIES: u32 = 2;
const BACKOFF_BASE: Duration = Duration::from_secs(2);

/// Model used when the caller does not pick one
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    pub timeout_secs: u64,
    /// Extra attempts after a rate limit, 5xx or connection failure
    pub max_retries: u32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Key from `GEMINI_API_KEY` or `GOOGLE_API_KEY`; base from `GEMINI_API_BASE`
    pub fn from_env() -> Result<Self> {
        let api_key = ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| !key.trim().is_empty())
            .ok_or(LLMError::MissingApiKey("GEMINI_API_KEY"))?;

        let mut config = Self::new(api_key);
        if let Ok(base) = std::env::var("GEMINI_API_BASE") {
            config.api_base = base;
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Gemini over HTTPS; the model is picked per request
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::MissingApiKey("GEMINI_API_KEY"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.config.api_base.trim_end_matches('/')
        )
    }

    async fn send_once(&self, model: &str, body: &GenerateRequest) -> Result<CompletionResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, text, model));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LLMError::MalformedResponse(e.to_string()))?;
        into_completion(parsed)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = GenerateRequest::from(&request);

        let mut attempt = 0;
        loop {
            match self.send_once(&request.model, &body).await {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let wait = backoff(attempt);
                    warn!(
                        "Gemini call failed ({e}), retry {attempt}/{} in {wait:?}",
                        self.config.max_retries
                    );
                    tokio::time::sleep(wait).await;
                }
                other => return other,
            }
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Wait before retry number `attempt` (1-based): 2s, 4s, 8s, ...
fn backoff(attempt: u32) -> Duration {
    BACKOFF_BASE.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

fn status_error(status: StatusCode, body: String, model: &str) -> LLMError {
    match status.as_u16() {
        401 | 403 => LLMError::Unauthorized(body),
        400 if body.contains("API_KEY_INVALID") => LLMError::Unauthorized(body),
        404 => LLMError::UnknownModel(model.to_string()),
        429 => LLMError::RateLimited(body),
        code => LLMError::Status { status: code, body },
    }
}

// Wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: WireGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: text.to_string(),
        }],
    }
}

impl From<&CompletionRequest> for GenerateRequest {
    fn from(request: &CompletionRequest) -> Self {
        let contents = request
            .messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Model => "model",
                };
                text_content(Some(role), &m.content)
            })
            .collect();

        Self {
            contents,
            system_instruction: request.system.as_deref().map(|s| text_content(None, s)),
            generation_config: WireGenerationConfig {
                max_output_tokens: request.params.max_output_tokens,
                temperature: request.params.temperature,
                stop_sequences: request.params.stop_sequences.clone(),
            },
        }
    }
}

fn finish_reason(raw: Option<&str>) -> FinishReason {
    match raw {
        None | Some("STOP") => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::MaxTokens,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            FinishReason::Filtered
        }
        Some(other) => {
            debug!("Unrecognized finish reason {other}");
            FinishReason::Other
        }
    }
}

/// First candidate as a completion; parts are concatenated
fn into_completion(response: GenerateResponse) -> Result<CompletionResponse> {
    let usage = response
        .usage_metadata
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(LLMError::Blocked(reason));
    };

    let reason = finish_reason(candidate.finish_reason.as_deref());
    let text: String = candidate
        .content
        .into_iter()
        .flat_map(|c| c.parts)
        .map(|p| p.text)
        .collect();

    if text.is_empty() && reason == FinishReason::Filtered {
        return Err(LLMError::Blocked(
            candidate.finish_reason.unwrap_or_default(),
        ));
    }

    debug!(
        "Gemini finished with {reason:?} after {}+{} tokens",
        usage.prompt_tokens, usage.output_tokens
    );

    Ok(CompletionResponse {
        text,
        finish_reason: reason,
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;
    use serde_json::json;

    fn parse(raw: serde_json::Value) -> Result<CompletionResponse> {
        into_completion(serde_json::from_value(raw).unwrap())
    }

    #[test]
    fn test_provider_requires_key() {
        assert!(matches!(
            GeminiProvider::new("  "),
            Err(LLMError::MissingApiKey(_))
        ));
        assert_eq!(GeminiProvider::new("k").unwrap().name(), "gemini");
    }

    #[test]
    fn test_endpoint() {
        let provider = GeminiProvider::with_config(
            GeminiConfig::new("k").with_api_base("https://proxy.example.com/v1beta/"),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint("gemini-1.5-flash"),
            "https://proxy.example.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest::builder("gemini-1.5-flash")
            .system("Be brief")
            .message(Message::user("Hello"))
            .message(Message::model("Hi"))
            .max_output_tokens(256)
            .temperature(Some(0.2))
            .build();

        let body = serde_json::to_value(GenerateRequest::from(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert!(body["generationConfig"].get("stopSequences").is_none());
    }

    #[test]
    fn test_parts_are_joined() {
        let parsed = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "- first\n"}, {"text": "- second"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8}
        }))
        .unwrap();

        assert_eq!(parsed.text, "- first\n- second");
        assert_eq!(parsed.finish_reason, FinishReason::Stop);
        assert_eq!(parsed.usage.total(), 20);
    }

    #[test]
    fn test_truncated_answer_is_kept() {
        let parsed = parse(json!({
            "candidates": [{"content": {"parts": [{"text": "partial"}]}, "finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();
        assert!(parsed.is_truncated());
    }

    #[test]
    fn test_blocked() {
        assert!(matches!(
            parse(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
            Err(LLMError::Blocked(reason)) if reason == "SAFETY"
        ));
        assert!(matches!(
            parse(json!({"candidates": [{"finishReason": "RECITATION"}]})),
            Err(LLMError::Blocked(_))
        ));
    }

    #[test]
    fn test_backoff_doubles_and_saturates() {
        assert_eq!(backoff(1), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(8));
        assert_eq!(backoff(40), backoff(33));
        assert!(backoff(u32::MAX) >= backoff(32));
    }

    #[test]
    fn test_status_mapping() {
        let err = status_error(StatusCode::NOT_FOUND, String::new(), "gemini-0");
        assert!(matches!(err, LLMError::UnknownModel(m) if m == "gemini-0"));

        let err = status_error(StatusCode::BAD_REQUEST, "API_KEY_INVALID".to_string(), "m");
        assert!(matches!(err, LLMError::Unauthorized(_)));

        assert!(status_error(StatusCode::TOO_MANY_REQUESTS, String::new(), "m").is_retryable());
        assert!(status_error(StatusCode::BAD_GATEWAY, String::new(), "m").is_retryable());
        assert!(!status_error(StatusCode::BAD_REQUEST, String::new(), "m").is_retryable());
    }

    #[tokio::test]
    #[ignore] // Requires GEMINI_API_KEY and network access
    async fn test_complete_live() {
        let provider = GeminiProvider::from_env().unwrap();
        let response = provider
            .complete(CompletionRequest::prompt(DEFAULT_GEMINI_MODEL, "Say OK"))
            .await
            .unwrap();
        assert!(!response.text.is_empty());
    }
}
