//! Return statistics over an aligned price table
//!
//! All functions are pure: the same table and metadata always produce the same
//! records in the same order.

use crate::model::{PriceTable, SecurityMeta, SymbolStat};
use std::collections::HashMap;

/// Consecutive close-to-close changes
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Change over the last trading day
pub fn latest_return(closes: &[f64]) -> Option<f64> {
    match closes {
        [.., prev, last] => finite((last - prev) / prev),
        _ => None,
    }
}

/// Change from the first to the last close
pub fn monthly_return(closes: &[f64]) -> Option<f64> {
    match closes {
        [first, .., last] => finite((last - first) / first),
        _ => None,
    }
}

/// Sample standard deviation of daily returns scaled by the square root of
/// the number of returns
///
/// Needs at least two returns (three closes).
pub fn monthly_sigma(closes: &[f64]) -> Option<f64> {
    let returns = daily_returns(closes);
    let n = returns.len();
    if n < 2 {
        return None;
    }

    let mean = returns.iter().sum::<f64>() / n as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

    finite(variance.sqrt() * (n as f64).sqrt())
}

fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// One record per retained symbol that also has metadata, ordered by symbol
///
/// A symbol is skipped when any statistic is undefined or non-finite.
pub fn compute_stats(
    table: &PriceTable,
    metadata: &HashMap<String, SecurityMeta>,
) -> Vec<SymbolStat> {
    table
        .iter()
        .filter_map(|(symbol, closes)| {
            let Some(meta) = metadata.get(symbol) else {
                tracing::debug!("No index metadata for {symbol}");
                return None;
            };

            let (Some(latest), Some(monthly), Some(sigma)) = (
                latest_return(closes),
                monthly_return(closes),
                monthly_sigma(closes),
            ) else {
                tracing::debug!("Statistics undefined for {symbol}");
                return None;
            };

            Some(SymbolStat {
                symbol: symbol.to_string(),
                security_name: meta.security.clone(),
                sector: meta.sector.clone(),
                latest_return: latest,
                monthly_return: monthly,
                monthly_sigma: sigma,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PriceBar, PriceSeries};
    use chrono::{Days, NaiveDate};

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        PriceSeries::new(
            symbol,
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PriceBar::flat(start + Days::new(i as u64), c))
                .collect(),
        )
    }

    fn meta(symbols: &[&str]) -> HashMap<String, SecurityMeta> {
        symbols
            .iter()
            .map(|s| {
                (
                    (*s).to_string(),
                    SecurityMeta {
                        symbol: (*s).to_string(),
                        security: format!("{s} Inc."),
                        sector: "Information Technology".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_latest_return() {
        assert_eq!(latest_return(&[100.0, 200.0, 150.0]), Some(-0.25));
        assert_eq!(latest_return(&[100.0]), None);
        assert_eq!(latest_return(&[]), None);
    }

    #[test]
    fn test_monthly_return_over_21_days() {
        let mut closes = vec![100.0; 21];
        for (i, c) in closes.iter_mut().enumerate() {
            *c = 100.0 + i as f64 * 0.5;
        }
        assert_eq!(closes[20], 110.0);

        let r = monthly_return(&closes).unwrap();
        assert!((r - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_monthly_sigma_sample_deviation() {
        // returns: +10%, -10%; mean 0, sample variance 0.02
        let sigma = monthly_sigma(&[100.0, 110.0, 99.0]).unwrap();
        let expected = 0.02_f64.sqrt() * 2.0_f64.sqrt();
        assert!((sigma - expected).abs() < 1e-12);
    }

    #[test]
    fn test_monthly_sigma_needs_two_returns() {
        assert_eq!(monthly_sigma(&[100.0, 101.0]), None);
    }

    #[test]
    fn test_sigma_scales_with_sqrt_of_observations() {
        let pattern = [
            0.01, -0.02, 0.015, -0.005, 0.02, -0.01, 0.005, -0.015, 0.01, 0.0, 0.012, -0.008,
            0.003, -0.011, 0.007, 0.0, -0.004, 0.009, -0.013, 0.006,
        ];

        let closes_for = |repeats: usize| {
            let mut closes = vec![100.0];
            for r in pattern.iter().cycle().take(pattern.len() * repeats) {
                let last = *closes.last().unwrap();
                closes.push(last * (1.0 + r));
            }
            closes
        };

        let short = monthly_sigma(&closes_for(1)).unwrap();
        let long = monthly_sigma(&closes_for(2)).unwrap();

        // n-1 normalization shifts the ratio by about 1.3% at n = 20
        let ratio = long / short;
        assert!((ratio / 2.0_f64.sqrt() - 1.0).abs() < 0.02, "ratio = {ratio}");
    }

    #[test]
    fn test_symbol_with_missing_observation_is_absent() {
        let full = series("AAPL", &[100.0, 101.0, 102.0, 103.0]);
        let mut bars = series("MSFT", &[200.0, 201.0, 202.0, 203.0]).bars().to_vec();
        bars.remove(2);
        let gappy = PriceSeries::new("MSFT", bars);

        let table = PriceTable::from_series([&full, &gappy]);
        let stats = compute_stats(&table, &meta(&["AAPL", "MSFT"]));

        let symbols: Vec<_> = stats.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL"]);
    }

    #[test]
    fn test_inner_join_with_metadata() {
        let a = series("AAPL", &[100.0, 101.0, 103.0]);
        let b = series("XYZ", &[10.0, 11.0, 12.0]);

        let table = PriceTable::from_series([&a, &b]);
        let stats = compute_stats(&table, &meta(&["AAPL"]));

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].security_name, "AAPL Inc.");
        assert_eq!(stats[0].sector, "Information Technology");
    }

    #[test]
    fn test_output_ordered_by_symbol() {
        let b = series("MSFT", &[10.0, 11.0, 12.0]);
        let a = series("AAPL", &[100.0, 101.0, 103.0]);

        let table = PriceTable::from_series([&b, &a]);
        let stats = compute_stats(&table, &meta(&["MSFT", "AAPL"]));

        assert_eq!(stats[0].symbol, "AAPL");
        assert_eq!(stats[1].symbol, "MSFT");
    }

    #[test]
    fn test_two_day_window_yields_no_records() {
        let a = series("AAPL", &[100.0, 101.0]);
        let table = PriceTable::from_series([&a]);
        assert!(compute_stats(&table, &meta(&["AAPL"])).is_empty());
    }

    #[test]
    fn test_compute_stats_is_idempotent() {
        let a = series("AAPL", &[100.0, 101.0, 99.5, 102.25]);
        let b = series("MSFT", &[400.0, 398.0, 405.0, 410.0]);
        let table = PriceTable::from_series([&a, &b]);
        let metadata = meta(&["AAPL", "MSFT"]);

        assert_eq!(compute_stats(&table, &metadata), compute_stats(&table, &metadata));
    }
}
