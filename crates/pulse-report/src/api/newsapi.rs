//! NewsAPI `/v2/everything` client
//!
//! The news feed is best effort: any failure yields an empty list.

use crate::error::Result;
use crate::model::NewsItem;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";
const REMOVED: &str = "[Removed]";

/// Relevance-ordered news about a company
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Articles published between `from` and `to` (inclusive), most relevant
    /// first; empty on any failure
    async fn fetch_news(&self, query: &str, from: NaiveDate, to: NaiveDate) -> Vec<NewsItem>;
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    /// Parsed one at a time by [`parse_articles`]
    #[serde(default)]
    articles: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    source: ArticleSource,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// NewsAPI client
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    language: String,
    base_url: String,
}

impl NewsApiClient {
    /// `language` is the two-letter code of the articles to request
    pub fn new(api_key: impl Into<String>, language: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            language: language.into(),
            base_url: EVERYTHING_URL.to_string(),
        })
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn request(&self, query: &str, from: NaiveDate, to: NaiveDate) -> Result<String> {
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("language", self.language.as_str()),
                ("sortBy", "relevancy"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        Ok(response.text().await?)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_news(&self, query: &str, from: NaiveDate, to: NaiveDate) -> Vec<NewsItem> {
        match self.request(query, from, to).await {
            Ok(body) => parse_articles(&body),
            Err(e) => {
                tracing::warn!("News request for {query:?} failed: {e}");
                Vec::new()
            }
        }
    }
}

/// Articles of a successful response, in feed order
///
/// Bodies that fail to parse or carry a non-`ok` status yield nothing.
/// Articles that fail to parse, lack a title or were withdrawn by the
/// publisher are skipped one by one.
pub fn parse_articles(body: &str) -> Vec<NewsItem> {
    let response: EverythingResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Unreadable news response: {e}");
            return Vec::new();
        }
    };

    if response.status != "ok" {
        tracing::warn!("News feed returned status {:?}", response.status);
        return Vec::new();
    }

    response
        .articles
        .into_iter()
        .filter_map(|value| {
            let article: Article = match serde_json::from_value(value) {
                Ok(article) => article,
                Err(e) => {
                    tracing::debug!("Skipping unreadable article: {e}");
                    return None;
                }
            };
            let title = article.title.filter(|t| !t.trim().is_empty() && t != REMOVED)?;
            Some(NewsItem {
                source: article.source.name.unwrap_or_default(),
                title,
                description: article.description.filter(|d| !d.trim().is_empty()),
                published_at: article.published_at,
                url: article.url.unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok_response() {
        let body = r#"{
            "status": "ok",
            "totalResults": 3,
            "articles": [
                {
                    "source": { "id": "reuters", "name": "Reuters" },
                    "title": "Apple beats estimates",
                    "description": "Quarterly revenue rose.",
                    "url": "https://example.com/1",
                    "publishedAt": "2024-12-20T14:05:00Z"
                },
                {
                    "source": { "id": null, "name": "Yahoo Entertainment" },
                    "title": "[Removed]",
                    "description": "[Removed]",
                    "url": "https://removed.com",
                    "publishedAt": "1970-01-01T00:00:00Z"
                },
                {
                    "source": { "id": null, "name": "The Verge" },
                    "title": "New iPhone rumors",
                    "description": null,
                    "url": "https://example.com/2",
                    "publishedAt": "2024-12-21T08:00:00Z"
                }
            ]
        }"#;

        let items = parse_articles(body);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, "Reuters");
        assert_eq!(items[0].title, "Apple beats estimates");
        assert_eq!(items[1].description, None);
        assert_eq!(
            items[1].published_at.to_rfc3339(),
            "2024-12-21T08:00:00+00:00"
        );
    }

    #[test]
    fn test_bad_article_skipped_alone() {
        let body = r#"{
            "status": "ok",
            "totalResults": 3,
            "articles": [
                {
                    "source": { "id": null, "name": "Bloomberg" },
                    "title": "Microsoft raises dividend",
                    "description": "Payout up 10%.",
                    "url": "https://example.com/msft",
                    "publishedAt": "2024-12-18T21:00:00Z"
                },
                {
                    "source": { "id": null, "name": "Blog" },
                    "title": "Undated post",
                    "description": null,
                    "url": "https://example.com/undated",
                    "publishedAt": null
                },
                {
                    "title": "No source given",
                    "url": "https://example.com/nosource",
                    "publishedAt": "2024-12-19T06:30:00Z"
                }
            ]
        }"#;

        let items = parse_articles(body);
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Microsoft raises dividend", "No source given"]);
        assert_eq!(items[1].source, "");
    }

    #[test]
    fn test_error_status_yields_empty() {
        let body = r#"{
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid or incorrect."
        }"#;
        assert!(parse_articles(body).is_empty());
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert!(parse_articles("<html>502 Bad Gateway</html>").is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_yields_empty() {
        let client = NewsApiClient::new("key", "en", Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/v2/everything");

        let day = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert!(client.fetch_news("Apple", day, day).await.is_empty());
    }
}
