//! Candlestick charts rendered by QuickChart
//!
//! The chart is a Chart.js config posted to quickchart.io, which answers with
//! a PNG. Candles use the chartjs-chart-financial plugin bundled by QuickChart.

use crate::error::{ReportError, Result};
use crate::model::PriceSeries;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;

const QUICKCHART_URL: &str = "https://quickchart.io/chart";
const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

/// Renders a price series to PNG bytes
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render_candlestick(&self, series: &PriceSeries) -> Result<Vec<u8>>;
}

/// quickchart.io client
pub struct QuickChartRenderer {
    client: Client,
    url: String,
}

impl QuickChartRenderer {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: QUICKCHART_URL.to_string(),
        })
    }
}

#[async_trait]
impl ChartRenderer for QuickChartRenderer {
    #[tracing::instrument(skip(self, series), fields(symbol = %series.symbol))]
    async fn render_candlestick(&self, series: &PriceSeries) -> Result<Vec<u8>> {
        let body = json!({
            "version": "2",
            "backgroundColor": "white",
            "width": WIDTH,
            "height": HEIGHT,
            "format": "png",
            "chart": candlestick_config(series),
        });

        let response = self.client.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ReportError::api("QuickChart", format!("{status}: {detail}")));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Chart.js config: candles on the price axis, volume bars below
pub fn candlestick_config(series: &PriceSeries) -> Value {
    let candles: Vec<Value> = series
        .bars()
        .iter()
        .map(|bar| {
            json!({
                "x": bar.date.format("%Y-%m-%d").to_string(),
                "o": bar.open,
                "h": bar.high,
                "l": bar.low,
                "c": bar.close,
            })
        })
        .collect();

    let volumes: Vec<Value> = series
        .bars()
        .iter()
        .map(|bar| {
            json!({
                "x": bar.date.format("%Y-%m-%d").to_string(),
                "y": bar.volume,
            })
        })
        .collect();

    json!({
        "type": "candlestick",
        "data": {
            "datasets": [
                {
                    "label": series.symbol,
                    "data": candles,
                    "yAxisID": "price",
                    "color": { "up": "#26a69a", "down": "#ef5350", "unchanged": "#999999" },
                },
                {
                    "type": "bar",
                    "label": "Volume",
                    "data": volumes,
                    "yAxisID": "volume",
                    "backgroundColor": "rgba(120, 120, 120, 0.4)",
                },
            ],
        },
        "options": {
            "title": { "display": true, "text": series.symbol },
            "legend": { "display": false },
            "scales": {
                "xAxes": [{ "type": "time", "time": { "unit": "day" }, "offset": true }],
                "yAxes": [
                    { "id": "price", "position": "right", "weight": 2 },
                    {
                        "id": "volume",
                        "position": "right",
                        "weight": 1,
                        "gridLines": { "display": false },
                        "ticks": { "beginAtZero": true },
                    },
                ],
            },
        },
    })
}
