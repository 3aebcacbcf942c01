//! Report orchestration
//!
//! One run: load the index members, download their prices, compute the
//! statistics, pick symbols and post four messages per symbol. Everything is
//! awaited in sequence; the pauses between posts keep the webhook and the
//! summarization service comfortable.

use crate::api::{
    ChartRenderer, ChatSink, DiscordWebhook, FundamentalsSource, LogSink, MembershipSource,
    NewsApiClient, NewsSource, PriceSource, QuickChartRenderer, WikipediaMembership,
    YahooFundamentalsClient, YahooPriceClient,
};
use crate::config::{PostDelays, PulseConfig};
use crate::error::{ReportError, Result};
use crate::model::{Fundamentals, PriceSeries, PriceTable, SecurityMeta, SymbolStat};
use crate::news::NewsDigest;
use crate::prompts::ReportPrompts;
use crate::selection::SelectionPolicy;
use crate::stats::compute_stats;
use crate::summarizer::Summarizer;
use chrono::NaiveDate;
use pulse_llm::LLMProvider;
use pulse_llm::providers::{GeminiConfig, GeminiProvider};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything the job talks to
#[derive(Clone)]
pub struct Collaborators {
    pub membership: Arc<dyn MembershipSource>,
    pub prices: Arc<dyn PriceSource>,
    pub fundamentals: Arc<dyn FundamentalsSource>,
    pub news: Arc<dyn NewsSource>,
    pub charts: Arc<dyn ChartRenderer>,
    pub sink: Arc<dyn ChatSink>,
    pub llm: Arc<dyn LLMProvider>,
}

impl Collaborators {
    /// Production clients; a dry run swaps the webhook for [`LogSink`]
    pub fn from_config(config: &PulseConfig) -> Result<Self> {
        let timeout = config.request_timeout;

        let sink: Arc<dyn ChatSink> = if config.dry_run {
            Arc::new(LogSink)
        } else {
            Arc::new(DiscordWebhook::new(
                &config.webhook_url,
                timeout,
                config.max_retries,
            )?)
        };

        let llm = GeminiProvider::with_config(gemini_config(config))?;

        Ok(Self {
            membership: Arc::new(WikipediaMembership::new(timeout)?),
            prices: Arc::new(YahooPriceClient::new(config.price_rate_limit)?),
            fundamentals: Arc::new(YahooFundamentalsClient::new(
                timeout,
                config.fundamentals_cache_ttl,
            )?),
            news: Arc::new(NewsApiClient::new(
                &config.news_api_key,
                &config.news_language,
                timeout,
            )?),
            charts: Arc::new(QuickChartRenderer::new(timeout)?),
            sink,
            llm: Arc::new(llm),
        })
    }
}

fn gemini_config(config: &PulseConfig) -> GeminiConfig {
    GeminiConfig::new(&config.gemini_api_key)
        .with_timeout(config.request_timeout.as_secs())
        .with_max_retries(config.max_retries)
}

/// Prices and statistics of the whole index for one run
#[derive(Debug, Clone)]
pub struct Universe {
    /// Index members listed
    pub members: usize,
    /// Aligned close prices of complete symbols
    pub table: PriceTable,
    /// Raw bars per symbol, for charts
    pub series: HashMap<String, PriceSeries>,
    /// Statistics ordered by symbol
    pub stats: Vec<SymbolStat>,
}

impl Universe {
    /// First and last trading date of the window
    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.table.date_window()
    }
}

/// Outcome of a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub members: usize,
    pub with_stats: usize,
    pub window: Option<(NaiveDate, NaiveDate)>,
    /// Symbols reported on, in posting order
    pub reported: Vec<SymbolStat>,
}

/// The daily report job
pub struct ReportJob {
    collaborators: Collaborators,
    prompts: ReportPrompts,
    summarizer: Summarizer,
    policy: Box<dyn SelectionPolicy>,
    delays: PostDelays,
    news_items: usize,
}

impl ReportJob {
    pub fn new(collaborators: Collaborators, config: &PulseConfig) -> Result<Self> {
        let summarizer = Summarizer::new(collaborators.llm.clone(), &config.model)
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature);

        Ok(Self {
            collaborators,
            prompts: ReportPrompts::new(config.language, config.news_items)?,
            summarizer,
            policy: config.strategy.policy(config.sample_size, config.seed),
            delays: config.delays,
            news_items: config.news_items,
        })
    }

    /// Replace the selection policy
    pub fn with_policy(mut self, policy: Box<dyn SelectionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Membership, prices and statistics
    ///
    /// Symbols whose download fails or comes back empty are left out.
    pub async fn load_universe(&self) -> Result<Universe> {
        let members = self.collaborators.membership.constituents().await?;
        let metadata: HashMap<String, SecurityMeta> = members
            .iter()
            .map(|m| (m.symbol.clone(), m.clone()))
            .collect();

        info!("Downloading prices for {} symbols", metadata.len());
        let mut series = HashMap::new();
        for member in &members {
            match self.collaborators.prices.daily_bars(&member.symbol).await {
                Ok(s) if s.is_empty() => debug!("No bars for {}", member.symbol),
                Ok(s) => {
                    series.insert(member.symbol.clone(), s);
                }
                Err(e) => warn!("Price download failed for {}: {e}", member.symbol),
            }
        }

        let table = PriceTable::from_series(series.values());
        let stats = compute_stats(&table, &metadata);
        info!(
            "Statistics for {} of {} members over {} trading days",
            stats.len(),
            members.len(),
            table.dates().len()
        );

        Ok(Universe {
            members: members.len(),
            table,
            series,
            stats,
        })
    }

    /// Run the whole report
    pub async fn run(&self) -> Result<RunSummary> {
        let universe = self.load_universe().await?;

        let Some(window) = universe.window().filter(|_| !universe.stats.is_empty()) else {
            warn!("No symbol has complete statistics; nothing to report");
            return Ok(RunSummary {
                members: universe.members,
                with_stats: 0,
                window: universe.window(),
                reported: Vec::new(),
            });
        };

        let selected = self.policy.select(&universe.stats);
        info!(
            "Selected {} symbols with the {} policy: {}",
            selected.len(),
            self.policy.name(),
            selected.join(", ")
        );

        let by_symbol: HashMap<&str, &SymbolStat> = universe
            .stats
            .iter()
            .map(|s| (s.symbol.as_str(), s))
            .collect();

        let mut reported = Vec::with_capacity(selected.len());
        for symbol in &selected {
            let stat = by_symbol
                .get(symbol.as_str())
                .ok_or_else(|| ReportError::DataUnavailable {
                    symbol: symbol.clone(),
                    reason: "selected symbol has no statistics".to_string(),
                })?;
            let series = universe.series.get(symbol.as_str()).ok_or_else(|| {
                ReportError::DataUnavailable {
                    symbol: symbol.clone(),
                    reason: "no price bars".to_string(),
                }
            })?;

            self.report_symbol(stat, series, window).await?;
            reported.push((*stat).clone());
        }

        Ok(RunSummary {
            members: universe.members,
            with_stats: universe.stats.len(),
            window: Some(window),
            reported,
        })
    }

    /// Post the four messages of one symbol
    ///
    /// A symbol the fundamentals feed does not know is reported with every
    /// financial field as `N/A`; other fundamentals errors abort.
    #[tracing::instrument(skip_all, fields(symbol = %stat.symbol))]
    pub async fn report_symbol(
        &self,
        stat: &SymbolStat,
        series: &PriceSeries,
        (from, to): (NaiveDate, NaiveDate),
    ) -> Result<()> {
        let c = &self.collaborators;

        let fundamentals = match c.fundamentals.fundamentals(&stat.symbol).await {
            Ok(fundamentals) => fundamentals,
            Err(ReportError::DataUnavailable { reason, .. }) => {
                warn!("No fundamentals ({reason}); reporting without them");
                Fundamentals::default()
            }
            Err(e) => return Err(e),
        };
        c.sink
            .post_text(&self.prompts.overview(stat, &fundamentals)?)
            .await?;
        info!("Posted statistics");
        pause(self.delays.after_overview).await;

        let png = c.charts.render_candlestick(series).await?;
        c.sink
            .post_image(&format!("{}.png", stat.symbol), png)
            .await?;
        info!("Posted chart");
        pause(self.delays.after_chart).await;

        let company_prompt = self.prompts.company_prompt(&stat.symbol, &fundamentals)?;
        let description = self.summarizer.summarize(&company_prompt).await?;
        c.sink
            .post_text(&self.prompts.company_message(&description)?)
            .await?;
        info!("Posted company summary");
        pause(self.delays.after_company).await;

        let news = c.news.fetch_news(&stat.security_name, from, to).await;
        let digest = NewsDigest::build(&news, self.news_items);
        debug!("{} news items, {} in digest", news.len(), digest.len());
        let forecast_prompt = self.prompts.forecast_prompt(stat, &digest)?;
        let forecast = self.summarizer.summarize(&forecast_prompt).await?;
        c.sink.post_text(&forecast).await?;
        info!("Posted forecast");
        pause(self.delays.after_forecast).await;

        Ok(())
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
