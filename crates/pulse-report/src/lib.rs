//! Daily S&P 500 market pulse
//!
//! This crate builds a short daily report on a handful of S&P 500 stocks and
//! posts it to a Discord channel. It includes:
//!
//! - Index membership scraped from Wikipedia
//! - One month of daily prices from Yahoo Finance
//! - Per-symbol return statistics (1-day, 1-month, 1-month sigma)
//! - Fundamentals from the Yahoo quote summary
//! - News digests from NewsAPI
//! - Candlestick charts rendered by QuickChart
//! - Company summaries and outlook comments written by Gemini
//!
//! # Architecture
//!
//! [`ReportJob`] drives a run. It loads the [`Universe`] once, asks a
//! [`SelectionPolicy`] which symbols to cover and posts four messages per
//! symbol through a [`ChatSink`]. Every outside service sits behind a trait
//! in [`api`], so the job can run against fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use pulse_report::{Collaborators, PulseConfig, ReportJob};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PulseConfig::from_env()?;
//!     let job = ReportJob::new(Collaborators::from_config(&config)?, &config)?;
//!
//!     let summary = job.run().await?;
//!     println!("Reported on {} symbols", summary.reported.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod news;
pub mod pipeline;
pub mod prompts;
pub mod selection;
pub mod stats;
pub mod summarizer;
pub mod symbols;

// Re-export main types for convenience
pub use api::ChatSink;
pub use config::{PostDelays, PulseConfig};
pub use error::{ConfigError, ReportError, Result};
pub use model::{Fundamentals, NewsItem, PriceBar, PriceSeries, PriceTable, SecurityMeta, SymbolStat};
pub use news::NewsDigest;
pub use pipeline::{Collaborators, ReportJob, RunSummary, Universe};
pub use prompts::ReportPrompts;
pub use selection::{Extremal, RandomSample, SelectionPolicy, SelectionStrategy};
pub use stats::compute_stats;
pub use summarizer::Summarizer;

// Re-export Language from pulse-prompt
pub use pulse_prompt::Language;
