//! Ask Gemini for a short summary of a piece of text
//!
//! To run this example:
//! ```bash
//! export GEMINI_API_KEY=your_key_here
//! cargo run -p pulse-llm --example gemini_summarize -- "Text to summarize"
//! ```

use pulse_llm::providers::gemini::DEFAULT_GEMINI_MODEL;
use pulse_llm::providers::GeminiProvider;
use pulse_llm::{CompletionRequest, LLMProvider, Message};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let text = env::args()
        .nth(1)
        .unwrap_or_else(|| "Apple designs smartphones, computers and services.".to_string());
    let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

    let provider = GeminiProvider::from_env()?;

    let request = CompletionRequest::builder(model)
        .system("You write short, plain financial summaries.")
        .message(Message::user(format!(
            "Summarize the following in three short bullet points:\n\n{text}"
        )))
        .max_output_tokens(512)
        .build();

    let response = provider.complete(request).await?;
    println!("{}", response.text);
    println!("\n({:?}, {} tokens)", response.finish_reason, response.usage.total());

    Ok(())
}
