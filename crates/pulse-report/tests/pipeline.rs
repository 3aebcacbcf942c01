//! End-to-end report runs against in-memory services

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use pulse_llm::{CompletionRequest, CompletionResponse, LLMProvider};
use pulse_report::api::{
    ChartRenderer, ChatSink, FundamentalsSource, MembershipSource, NewsSource, PriceSource,
};
use pulse_report::{
    Collaborators, Fundamentals, Language, NewsItem, PostDelays, PriceBar, PriceSeries,
    PulseConfig, ReportError, ReportJob, Result, SecurityMeta, SelectionStrategy,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 1).unwrap()
}

fn closes(first: f64, step: f64, days: usize) -> Vec<f64> {
    (0..days).map(|i| first + step * i as f64).collect()
}

struct StaticMembers(Vec<SecurityMeta>);

#[async_trait]
impl MembershipSource for StaticMembers {
    async fn constituents(&self) -> Result<Vec<SecurityMeta>> {
        Ok(self.0.clone())
    }
}

/// Closes per symbol; symbols absent from the map fail to download
struct StaticPrices {
    closes: HashMap<String, Vec<f64>>,
    skip_day: Option<(String, usize)>,
}

#[async_trait]
impl PriceSource for StaticPrices {
    async fn daily_bars(&self, symbol: &str) -> Result<PriceSeries> {
        let closes = self
            .closes
            .get(symbol)
            .ok_or_else(|| ReportError::YahooFinanceError(format!("no data for {symbol}")))?;

        let bars = closes
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                self.skip_day
                    .as_ref()
                    .is_none_or(|(s, day)| s != symbol || day != i)
            })
            .map(|(i, close)| PriceBar::flat(start() + Duration::days(i as i64), *close))
            .collect();
        Ok(PriceSeries::new(symbol, bars))
    }
}

struct NamedFundamentals;

#[async_trait]
impl FundamentalsSource for NamedFundamentals {
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        Ok(Fundamentals {
            short_name: Some(format!("{symbol} Corp")),
            market_cap: Some(3.5e12),
            ..Default::default()
        })
    }
}

/// Records every query it is asked
#[derive(Default)]
struct RecordingNews {
    queries: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

#[async_trait]
impl NewsSource for RecordingNews {
    async fn fetch_news(&self, query: &str, from: NaiveDate, to: NaiveDate) -> Vec<NewsItem> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), from, to));
        vec![NewsItem {
            source: "Reuters".to_string(),
            title: format!("{query} beats estimates"),
            description: Some("Quarterly results".to_string()),
            published_at: Utc.with_ymd_and_hms(2024, 11, 20, 14, 0, 0).unwrap(),
            url: "https://example.com/news".to_string(),
        }]
    }
}

struct TinyChart;

#[async_trait]
impl ChartRenderer for TinyChart {
    async fn render_candlestick(&self, _series: &PriceSeries) -> Result<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Posted {
    Text(String),
    Image(String),
}

#[derive(Default)]
struct RecordingSink {
    posts: Mutex<Vec<Posted>>,
}

#[async_trait]
impl ChatSink for RecordingSink {
    async fn post_text(&self, content: &str) -> Result<()> {
        self.posts
            .lock()
            .unwrap()
            .push(Posted::Text(content.to_string()));
        Ok(())
    }

    async fn post_image(&self, filename: &str, _png: Vec<u8>) -> Result<()> {
        self.posts
            .lock()
            .unwrap()
            .push(Posted::Image(filename.to_string()));
        Ok(())
    }
}

/// Tells company prompts and forecast prompts apart by their content
struct ScriptedLlm;

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> pulse_llm::Result<CompletionResponse> {
        let prompt = request.last_user_text().unwrap_or_default();
        let reply = if prompt.contains("relevant news:") {
            "## Outlook\n- Momentum may continue"
        } else if prompt.contains("事業内容") {
            "- スマートフォンを設計"
        } else {
            "- Designs phones"
        };
        Ok(CompletionResponse::stop(reply))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn member(symbol: &str, security: &str) -> SecurityMeta {
    SecurityMeta {
        symbol: symbol.to_string(),
        security: security.to_string(),
        sector: "Information Technology".to_string(),
    }
}

struct Harness {
    sink: Arc<RecordingSink>,
    news: Arc<RecordingNews>,
    collaborators: Collaborators,
}

fn harness() -> Harness {
    let members = vec![
        member("AAPL", "Apple Inc."),
        member("MSFT", "Microsoft"),
        member("NVDA", "Nvidia"),
        member("BRK-B", "Berkshire Hathaway"),
        member("GAPS", "Gappy Holdings"),
    ];

    let mut series = HashMap::new();
    series.insert("AAPL".to_string(), closes(100.0, 1.0, 21));
    series.insert("MSFT".to_string(), closes(400.0, -2.0, 21));
    series.insert("NVDA".to_string(), closes(130.0, 0.1, 21));
    series.insert("GAPS".to_string(), closes(50.0, 0.5, 21));

    let sink = Arc::new(RecordingSink::default());
    let news = Arc::new(RecordingNews::default());
    let collaborators = Collaborators {
        membership: Arc::new(StaticMembers(members)),
        prices: Arc::new(StaticPrices {
            closes: series,
            skip_day: Some(("GAPS".to_string(), 7)),
        }),
        fundamentals: Arc::new(NamedFundamentals),
        news: news.clone(),
        charts: Arc::new(TinyChart),
        sink: sink.clone(),
        llm: Arc::new(ScriptedLlm),
    };

    Harness {
        sink,
        news,
        collaborators,
    }
}

fn config(language: Language) -> PulseConfig {
    PulseConfig::builder()
        .dry_run(true)
        .sample_size(1)
        .strategy(SelectionStrategy::Extremal)
        .language(language)
        .delays(PostDelays::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_universe_drops_failed_and_gappy_symbols() {
    let h = harness();
    let job = ReportJob::new(h.collaborators, &config(Language::English)).unwrap();

    let universe = job.load_universe().await.unwrap();

    assert_eq!(universe.members, 5);
    let symbols: Vec<&str> = universe.stats.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA"]);
    assert_eq!(
        universe.window(),
        Some((start(), start() + Duration::days(20)))
    );
}

#[tokio::test]
async fn test_run_posts_four_messages_per_symbol() {
    let h = harness();
    let job = ReportJob::new(h.collaborators, &config(Language::English)).unwrap();

    let summary = job.run().await.unwrap();

    let reported: Vec<&str> = summary.reported.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(reported, vec!["AAPL", "MSFT"]);
    assert_eq!(summary.with_stats, 3);

    let posts = h.sink.posts.lock().unwrap().clone();
    assert_eq!(posts.len(), 8);

    for (chunk, symbol) in posts.chunks(4).zip(["AAPL", "MSFT"]) {
        match &chunk[0] {
            Posted::Text(text) => {
                assert!(text.starts_with("# "));
                assert!(text.contains(&format!("({symbol})")));
                assert!(text.contains("## Financials"));
                assert!(text.contains("Market cap: 3.50T"));
            }
            other => panic!("expected overview text, got {other:?}"),
        }
        assert_eq!(chunk[1], Posted::Image(format!("{symbol}.png")));
        assert_eq!(
            chunk[2],
            Posted::Text("## Business summary\n- Designs phones".to_string())
        );
        assert_eq!(
            chunk[3],
            Posted::Text("## Outlook\n- Momentum may continue".to_string())
        );
    }

    let queries = h.news.queries.lock().unwrap().clone();
    assert_eq!(
        queries,
        vec![
            ("Apple Inc.".to_string(), start(), start() + Duration::days(20)),
            ("Microsoft".to_string(), start(), start() + Duration::days(20)),
        ]
    );
}

#[tokio::test]
async fn test_japanese_report() {
    let h = harness();
    let job = ReportJob::new(h.collaborators, &config(Language::Japanese)).unwrap();

    job.run().await.unwrap();

    let posts = h.sink.posts.lock().unwrap().clone();
    match &posts[0] {
        Posted::Text(text) => {
            assert!(text.contains("直近1日のリターン"));
            assert!(text.contains("## 財務情報"));
        }
        other => panic!("expected overview text, got {other:?}"),
    }
    assert_eq!(
        posts[2],
        Posted::Text("## 事業内容\n- スマートフォンを設計".to_string())
    );
}
