//! Yahoo Finance daily price history

use crate::error::{ReportError, Result};
use crate::model::{PriceBar, PriceSeries};
use async_trait::async_trait;
use chrono::DateTime;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use yahoo_finance_api as yahoo;

/// Bar interval requested from the feed
pub const INTERVAL: &str = "1d";
/// Lookback requested from the feed
pub const RANGE: &str = "1mo";

/// Daily OHLCV history for one symbol
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Bars over the lookback window
    async fn daily_bars(&self, symbol: &str) -> Result<PriceSeries>;
}

/// Yahoo chart API client paced by a rate limiter
pub struct YahooPriceClient {
    connector: yahoo::YahooConnector,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl YahooPriceClient {
    /// `rate_limit` is requests per minute; zero is treated as one
    pub fn new(rate_limit: u32) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| ReportError::YahooFinanceError(e.to_string()))?;
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            connector,
            rate_limiter: RateLimiter::direct(quota),
        })
    }
}

#[async_trait]
impl PriceSource for YahooPriceClient {
    #[tracing::instrument(skip(self))]
    async fn daily_bars(&self, symbol: &str) -> Result<PriceSeries> {
        self.rate_limiter.until_ready().await;

        let response = self
            .connector
            .get_quote_range(symbol, INTERVAL, RANGE)
            .await
            .map_err(|e| ReportError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| ReportError::YahooFinanceError(e.to_string()))?;

        let bars = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(PriceBar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        Ok(PriceSeries::new(symbol, bars))
    }
}
