//! Per-run data records
//!
//! Everything here is built fresh for a run, held in memory and dropped once
//! the messages are posted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One daily OHLCV bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// A bar whose open, high and low all equal the close
    pub fn flat(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }
}

/// Daily bars of one symbol over the lookback window, dates strictly increasing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Sorts bars by date; a repeated date keeps the last bar seen
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        let by_date: BTreeMap<NaiveDate, PriceBar> =
            bars.into_iter().map(|bar| (bar.date, bar)).collect();

        Self {
            symbol: symbol.into(),
            bars: by_date.into_values().collect(),
        }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}

/// Close prices aligned on a shared calendar
///
/// The calendar is the union of the dates of every input series. Only symbols
/// with a usable close on every calendar date are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    closes: BTreeMap<String, Vec<f64>>,
}

impl PriceTable {
    pub fn from_series<'a, I>(series: I) -> Self
    where
        I: IntoIterator<Item = &'a PriceSeries>,
    {
        let series: Vec<&PriceSeries> = series.into_iter().collect();

        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.bars.iter().map(|bar| bar.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut closes = BTreeMap::new();
        for s in series {
            let complete = s.bars.len() == dates.len()
                && s.bars.iter().zip(&dates).all(|(bar, date)| bar.date == *date);
            if !complete {
                tracing::debug!(
                    "Dropping {}: {} of {} trading days present",
                    s.symbol,
                    s.bars.len(),
                    dates.len()
                );
                continue;
            }

            if s.bars.iter().any(|bar| !bar.close.is_finite() || bar.close <= 0.0) {
                tracing::debug!("Dropping {}: unusable close price", s.symbol);
                continue;
            }

            closes.insert(
                s.symbol.clone(),
                s.bars.iter().map(|bar| bar.close).collect(),
            );
        }

        Self { dates, closes }
    }

    /// Trading dates of the table, ascending
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// First and last trading date
    pub fn date_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    /// Close prices of a retained symbol
    pub fn closes(&self, symbol: &str) -> Option<&[f64]> {
        self.closes.get(symbol).map(Vec::as_slice)
    }

    /// Retained symbols with their closes, ordered by symbol
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.closes.iter().map(|(s, c)| (s.as_str(), c.as_slice()))
    }

    pub fn symbol_count(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

/// Index membership record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityMeta {
    /// Ticker in price-feed form (`BRK-B`)
    pub symbol: String,
    /// Display name
    pub security: String,
    /// GICS sector
    pub sector: String,
}

/// Return statistics of one symbol over the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolStat {
    pub symbol: String,
    pub security_name: String,
    pub sector: String,
    /// Last close-to-close change
    pub latest_return: f64,
    /// First-to-last close change
    pub monthly_return: f64,
    /// Daily-return sample deviation scaled to the window
    pub monthly_sigma: f64,
}

/// Company fundamentals; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub business_summary: Option<String>,
    pub market_cap: Option<f64>,
    pub total_revenue: Option<f64>,
    pub gross_margins: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub total_debt: Option<f64>,
    pub total_equity: Option<f64>,
}

impl Fundamentals {
    /// Total debt over stockholder equity, when both are known and non-zero
    pub fn debt_to_equity(&self) -> Option<f64> {
        match (self.total_debt, self.total_equity) {
            (Some(debt), Some(equity)) if debt != 0.0 && equity != 0.0 => {
                Some(debt / equity).filter(|r| r.is_finite())
            }
            _ => None,
        }
    }
}

/// One news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub source: String,
    /// Dedup key
    pub title: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
    pub url: String,
}
