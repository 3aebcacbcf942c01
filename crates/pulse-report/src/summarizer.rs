//! Thin wrapper that turns a prompt into model text

use crate::error::Result;
use pulse_llm::{CompletionRequest, LLMError, LLMProvider, Message};
use std::sync::Arc;

/// Sends single-turn prompts to an [`LLMProvider`]
#[derive(Clone)]
pub struct Summarizer {
    provider: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: usize,
    temperature: Option<f32>,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 2048,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Complete `prompt` and return the trimmed answer
    #[tracing::instrument(skip(self, prompt), fields(provider = self.provider.name(), model = %self.model))]
    pub async fn summarize(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest::builder(&self.model)
            .message(Message::user(prompt))
            .max_output_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build();

        let response = self.provider.complete(request).await?;
        if response.is_truncated() {
            tracing::warn!("Completion truncated at {} tokens", self.max_tokens);
        }
        tracing::debug!(
            "Used {} prompt / {} output tokens",
            response.usage.prompt_tokens,
            response.usage.output_tokens
        );

        let text = response.text.trim();
        if text.is_empty() {
            return Err(LLMError::EmptyCompletion.into());
        }
        Ok(text.to_string())
    }
}
