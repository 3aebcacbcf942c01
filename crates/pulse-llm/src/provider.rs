//! Provider trait

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A text-generation service
///
/// One request, one response; no streaming.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl LLMProvider for Echo {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            Ok(CompletionResponse::stop(
                request.last_user_text().unwrap_or_default(),
            ))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_provider_as_trait_object() {
        let provider: Box<dyn LLMProvider> = Box::new(Echo);
        let request = CompletionRequest::prompt("gemini-1.5-flash", "text");

        let response = tokio_test::block_on(provider.complete(request)).unwrap();

        assert_eq!(provider.name(), "echo");
        assert_eq!(response.text, "text");
    }
}
