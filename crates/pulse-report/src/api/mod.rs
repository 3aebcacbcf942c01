//! External collaborators
//!
//! Each one sits behind a trait so the pipeline can run against in-memory
//! fakes.

pub mod discord;
pub mod fundamentals;
pub mod newsapi;
pub mod quickchart;
pub mod wikipedia;
pub mod yahoo;

pub use discord::{ChatSink, DiscordWebhook, LogSink, split_message};
pub use fundamentals::{FundamentalsSource, YahooFundamentalsClient};
pub use newsapi::{NewsApiClient, NewsSource};
pub use quickchart::{ChartRenderer, QuickChartRenderer};
pub use wikipedia::{MembershipSource, WikipediaMembership};
pub use yahoo::{PriceSource, YahooPriceClient};
