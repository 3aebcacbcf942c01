//! S&P 500 membership from the Wikipedia constituents table

use crate::error::{ReportError, Result};
use crate::model::SecurityMeta;
use crate::symbols::normalize_symbol;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

const CONSTITUENTS_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";
const USER_AGENT: &str = concat!("market-pulse/", env!("CARGO_PKG_VERSION"));

/// Source of the index universe
#[async_trait]
pub trait MembershipSource: Send + Sync {
    /// Index members with tickers in price-feed form
    async fn constituents(&self) -> Result<Vec<SecurityMeta>>;
}

/// Scrapes the "List of S&P 500 companies" article
pub struct WikipediaMembership {
    client: Client,
    url: String,
}

impl WikipediaMembership {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: CONSTITUENTS_URL.to_string(),
        })
    }
}

#[async_trait]
impl MembershipSource for WikipediaMembership {
    #[tracing::instrument(skip(self))]
    async fn constituents(&self) -> Result<Vec<SecurityMeta>> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(ReportError::api(
                "Wikipedia",
                format!("constituents page returned {}", response.status()),
            ));
        }

        let html = response.text().await?;
        let members = parse_constituents(&html)?;
        tracing::info!("Loaded {} index members", members.len());
        Ok(members)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ReportError::MembershipParse(format!("{css}: {e}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Read symbol, security and GICS sector out of the `#constituents` table
///
/// Columns are located by header text, so reordering on the page is harmless.
pub fn parse_constituents(html: &str) -> Result<Vec<SecurityMeta>> {
    let document = Html::parse_document(html);
    let table_sel = selector("table#constituents")?;
    let header_sel = selector("tr th")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ReportError::MembershipParse("no table#constituents".to_string()))?;

    let headers: Vec<String> = table.select(&header_sel).map(cell_text).collect();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReportError::MembershipParse(format!("missing column {name:?}")))
    };
    let symbol_col = column("Symbol")?;
    let security_col = column("Security")?;
    let sector_col = column("GICS Sector")?;

    let members: Vec<SecurityMeta> = table
        .select(&row_sel)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
            let symbol = cells.get(symbol_col).filter(|s| !s.is_empty())?;
            Some(SecurityMeta {
                symbol: normalize_symbol(symbol),
                security: cells.get(security_col)?.clone(),
                sector: cells.get(sector_col)?.clone(),
            })
        })
        .collect();

    if members.is_empty() {
        return Err(ReportError::MembershipParse(
            "constituents table has no rows".to_string(),
        ));
    }

    Ok(members)
}
