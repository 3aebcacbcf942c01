//! Discord webhook sink
//!
//! Text goes out as JSON `content`, split into chunks Discord accepts. Images
//! go out as a multipart file upload. A 429 answer is retried after the
//! `retry_after` the server asks for, up to `max_retries` times.

use crate::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Discord's per-message character limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Wait used when a 429 answer carries no usable `retry_after`
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Where report messages are posted
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Post a text message
    async fn post_text(&self, content: &str) -> Result<()>;

    /// Post an image file
    async fn post_image(&self, filename: &str, png: Vec<u8>) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct RateLimited {
    retry_after: f64,
}

/// Discord webhook client
pub struct DiscordWebhook {
    client: Client,
    url: String,
    max_retries: u32,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>, timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            max_retries,
        })
    }

    /// Send a request, retrying while the webhook is rate limited
    ///
    /// `build` is called once per attempt since multipart bodies cannot be
    /// cloned.
    async fn execute<F>(&self, build: F) -> Result<()>
    where
        F: Fn() -> Result<RequestBuilder> + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            let response = build()?.send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(());
            }

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.max_retries {
                let header_wait = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<f64>().ok());
                let body = response.text().await.unwrap_or_default();
                let wait = retry_after(&body, header_wait);

                attempt += 1;
                tracing::warn!(
                    "Discord rate limited, retrying in {:?} ({attempt}/{})",
                    wait,
                    self.max_retries
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ReportError::RateLimitExceeded {
                    provider: "Discord".to_string(),
                });
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::api("Discord", format!("{status}: {body}")));
        }
    }
}

#[async_trait]
impl ChatSink for DiscordWebhook {
    async fn post_text(&self, content: &str) -> Result<()> {
        for chunk in split_message(content, MESSAGE_LIMIT) {
            self.execute(|| {
                Ok(self.client.post(&self.url).json(&json!({
                    "content": chunk,
                    "allowed_mentions": { "parse": [] },
                })))
            })
            .await?;
        }
        Ok(())
    }

    async fn post_image(&self, filename: &str, png: Vec<u8>) -> Result<()> {
        self.execute(|| {
            let part = Part::bytes(png.clone())
                .file_name(filename.to_string())
                .mime_str("image/png")?;
            Ok(self.client.post(&self.url).multipart(Form::new().part("file", part)))
        })
        .await
    }
}

/// Seconds to wait, from the JSON body first, then the `Retry-After` header
fn retry_after(body: &str, header: Option<f64>) -> Duration {
    serde_json::from_str::<RateLimited>(body)
        .ok()
        .map(|r| r.retry_after)
        .or(header)
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map_or(DEFAULT_RETRY_AFTER, Duration::from_secs_f64)
}

/// Split text into chunks of at most `limit` characters
///
/// Breaks fall on line boundaries; a single line longer than `limit` is cut
/// at character boundaries.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > limit {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                if piece.len() == limit {
                    chunks.push(piece.iter().collect());
                } else {
                    current = piece.iter().collect();
                    current_len = piece.len();
                }
            }
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Sink that logs messages instead of posting them
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl ChatSink for LogSink {
    async fn post_text(&self, content: &str) -> Result<()> {
        tracing::info!("[dry-run] message:\n{content}");
        Ok(())
    }

    async fn post_image(&self, filename: &str, png: Vec<u8>) -> Result<()> {
        tracing::info!("[dry-run] image {filename} ({} bytes)", png.len());
        Ok(())
    }
}
