//! News digest: the most relevant and the most recent articles
//!
//! The digest is the news half of the forecast prompt. It has two sections,
//! each holding at most `n` articles, and never repeats a title.

use crate::model::NewsItem;
use chrono::SecondsFormat;
use pulse_prompt::PromptBuilder;
use std::collections::HashSet;

/// Selected articles for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct NewsDigest {
    n: usize,
    relevant: Vec<NewsItem>,
    recent: Vec<NewsItem>,
}

impl NewsDigest {
    /// Select articles from a relevance-ordered list
    ///
    /// The relevant section takes the first `n` distinct titles in feed order.
    /// The recent section scans everything newest first (ties keep feed
    /// order) and takes up to `n` titles not already taken.
    pub fn build(items: &[NewsItem], n: usize) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();

        let relevant: Vec<NewsItem> = items
            .iter()
            .filter(|item| seen.insert(item.title.as_str()))
            .take(n)
            .cloned()
            .collect();

        let mut by_date: Vec<&NewsItem> = items.iter().collect();
        by_date.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let recent: Vec<NewsItem> = by_date
            .into_iter()
            .filter(|item| seen.insert(item.title.as_str()))
            .take(n)
            .cloned()
            .collect();

        Self { n, relevant, recent }
    }

    pub fn relevant(&self) -> &[NewsItem] {
        &self.relevant
    }

    pub fn recent(&self) -> &[NewsItem] {
        &self.recent
    }

    /// Total number of selected articles
    pub fn len(&self) -> usize {
        self.relevant.len() + self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render both sections in the fixed digest format
    pub fn render(&self) -> String {
        let n = self.n;
        PromptBuilder::new()
            .line(format!("Top {n} relevant news:"))
            .newline()
            .each(&self.relevant, render_item)
            .line(format!("Top {n} latest news:"))
            .newline()
            .each(&self.recent, render_item)
            .build()
    }
}

fn render_item(builder: PromptBuilder, item: &NewsItem) -> PromptBuilder {
    builder
        .line(&item.title)
        .field("Source", &item.source)
        .field(
            "Published at",
            item.published_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
        .field("Description", item.description.as_deref().unwrap_or("N/A"))
        .field("URL", &item.url)
        .newline()
}

/// Build and render a digest in one step
pub fn digest(items: &[NewsItem], n: usize) -> String {
    NewsDigest::build(items, n).render()
}
