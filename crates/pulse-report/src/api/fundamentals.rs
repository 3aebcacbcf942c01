//! Company fundamentals from the Yahoo quoteSummary endpoint
//!
//! quoteSummary needs a session cookie and a matching crumb. The cookie comes
//! from any `fc.yahoo.com` response; the crumb from `/v1/test/getcrumb`. Both
//! are fetched lazily and refreshed once when the endpoint answers 401.

use crate::cache::FundamentalsCache;
use crate::error::{ReportError, Result};
use crate::model::Fundamentals;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const MODULES: &str =
    "price,summaryProfile,summaryDetail,financialData,defaultKeyStatistics,balanceSheetHistory";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Company profile and key ratios for one symbol
#[async_trait]
pub trait FundamentalsSource: Send + Sync {
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals>;
}

/// quoteSummary client with a per-run cache
pub struct YahooFundamentalsClient {
    client: Client,
    crumb: Mutex<Option<String>>,
    cache: FundamentalsCache,
}

impl YahooFundamentalsClient {
    pub fn new(timeout: Duration, cache_ttl: Duration) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            crumb: Mutex::new(None),
            cache: FundamentalsCache::new(cache_ttl),
        })
    }

    async fn crumb(&self, refresh: bool) -> Result<String> {
        let mut crumb = self.crumb.lock().await;
        if let (Some(value), false) = (crumb.as_ref(), refresh) {
            return Ok(value.clone());
        }

        // Only the Set-Cookie header matters; the status is usually 404
        let _ = self.client.get(COOKIE_URL).send().await?;

        let response = self.client.get(CRUMB_URL).send().await?;
        if !response.status().is_success() {
            return Err(ReportError::api(
                "Yahoo",
                format!("crumb request failed with {}", response.status()),
            ));
        }

        let value = response.text().await?.trim().to_string();
        if value.is_empty() {
            return Err(ReportError::api("Yahoo", "empty crumb"));
        }

        *crumb = Some(value.clone());
        Ok(value)
    }

    async fn fetch(&self, symbol: &str) -> Result<Fundamentals> {
        let mut refreshed = false;
        loop {
            let crumb = self.crumb(refreshed).await?;
            let response = self
                .client
                .get(format!("{QUOTE_SUMMARY_URL}/{symbol}"))
                .query(&[("modules", MODULES), ("crumb", crumb.as_str())])
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !refreshed {
                tracing::debug!("Yahoo crumb rejected, refreshing");
                refreshed = true;
                continue;
            }

            if status == StatusCode::NOT_FOUND {
                return Err(ReportError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: "quoteSummary returned 404".to_string(),
                });
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ReportError::api("Yahoo", format!("{status}: {body}")));
            }

            let body: Value = response.json().await?;
            return parse_quote_summary(symbol, &body);
        }
    }
}

#[async_trait]
impl FundamentalsSource for YahooFundamentalsClient {
    #[tracing::instrument(skip(self))]
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        self.cache.get_or_fetch(symbol, || self.fetch(symbol)).await
    }
}

/// Extract fundamentals from a quoteSummary response body
pub fn parse_quote_summary(symbol: &str, body: &Value) -> Result<Fundamentals> {
    let result = body
        .pointer("/quoteSummary/result/0")
        .ok_or_else(|| ReportError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: body
                .pointer("/quoteSummary/error/description")
                .and_then(Value::as_str)
                .unwrap_or("empty quoteSummary result")
                .to_string(),
        })?;

    let text = |path: &str| {
        result
            .pointer(path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    // Yahoo wraps numbers as {"raw": 1.0, "fmt": "1.00"}; empty objects mean missing
    let number = |path: &str| {
        result
            .pointer(path)
            .and_then(|v| v.get("raw").unwrap_or(v).as_f64())
            .filter(|v| v.is_finite())
    };

    Ok(Fundamentals {
        short_name: text("/price/shortName"),
        sector: text("/summaryProfile/sector"),
        industry: text("/summaryProfile/industry"),
        business_summary: text("/summaryProfile/longBusinessSummary"),
        market_cap: number("/price/marketCap").or_else(|| number("/summaryDetail/marketCap")),
        total_revenue: number("/financialData/totalRevenue"),
        gross_margins: number("/financialData/grossMargins"),
        trailing_pe: number("/summaryDetail/trailingPE"),
        price_to_book: number("/defaultKeyStatistics/priceToBook"),
        total_debt: number("/financialData/totalDebt"),
        total_equity: number(
            "/balanceSheetHistory/balanceSheetStatements/0/totalStockholderEquity",
        ),
    })
}
