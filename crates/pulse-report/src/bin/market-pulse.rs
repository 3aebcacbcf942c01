//! Market pulse CLI
//!
//! Runs one daily report and posts it to Discord.
//!
//! # Usage
//!
//! ```bash
//! # Secrets come from the environment or a .env file
//! export DISCORD_WEBHOOK_URL="https://discord.com/api/webhooks/..."
//! export NEWS_API_KEY="..."
//! export GEMINI_API_KEY="..."
//!
//! # Post the report
//! cargo run --bin market-pulse
//!
//! # Log the messages instead of posting them
//! cargo run --bin market-pulse -- --dry-run --strategy extremal --language ja
//! ```

use clap::Parser;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use pulse_report::config::DISCORD_WEBHOOK_URL;
use pulse_report::prompts::format::format_percent;
use pulse_report::{
    Collaborators, Language, PostDelays, PulseConfig, ReportJob, RunSummary, SelectionStrategy,
};
use tracing::{Instrument, info, info_span};

#[derive(Parser, Debug)]
#[command(name = "market-pulse")]
#[command(about = "Post a daily S&P 500 market pulse to Discord", long_about = None)]
struct Args {
    /// Number of symbols to report on
    #[arg(short = 'n', long)]
    sample: Option<usize>,

    /// How symbols are picked
    #[arg(short, long, value_enum)]
    strategy: Option<SelectionStrategy>,

    /// Seed for the random pick
    #[arg(long)]
    seed: Option<u64>,

    /// News items per digest section
    #[arg(long)]
    news: Option<usize>,

    /// Report language (en, ja)
    #[arg(short, long)]
    language: Option<Language>,

    /// Gemini model name
    #[arg(short, long)]
    model: Option<String>,

    /// Log messages instead of posting them
    #[arg(long)]
    dry_run: bool,

    /// Post without pausing between messages
    #[arg(long)]
    no_delay: bool,
}

fn build_config(args: &Args) -> anyhow::Result<PulseConfig> {
    pulse_utils::load_dotenv();

    let mut builder = PulseConfig::builder().dry_run(args.dry_run);
    if let Some(n) = args.sample {
        builder = builder.sample_size(n);
    }
    if let Some(strategy) = args.strategy {
        builder = builder.strategy(strategy);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if let Some(n) = args.news {
        builder = builder.news_items(n);
    }
    if let Some(language) = args.language {
        builder = builder.language(language);
    }
    if let Some(model) = &args.model {
        builder = builder.model(model.clone());
    }
    if args.no_delay {
        builder = builder.delays(PostDelays::none());
    }
    // A dry run never touches the webhook
    if args.dry_run && pulse_utils::require_var(DISCORD_WEBHOOK_URL).is_err() {
        builder = builder.webhook_url("");
    }

    Ok(builder.with_env()?.build()?)
}

fn print_summary(summary: &RunSummary) {
    match summary.window {
        Some((from, to)) => println!(
            "{} of {} members had complete prices from {from} to {to}",
            summary.with_stats, summary.members
        ),
        None => println!("No price window for {} members", summary.members),
    }

    if summary.reported.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Symbol", "Security", "Sector", "1D", "1M", "1M sigma"]);
    for stat in &summary.reported {
        table.add_row(vec![
            stat.symbol.clone(),
            stat.security_name.clone(),
            stat.sector.clone(),
            format_percent(Some(stat.latest_return)),
            format_percent(Some(stat.monthly_return)),
            format_percent(Some(stat.monthly_sigma)),
        ]);
    }
    println!("{table}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    pulse_utils::init_tracing_with_default("warn,pulse_report=info,market_pulse=info");

    let args = Args::parse();
    let config = build_config(&args)?;

    let run_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("run", id = %run_id);

    let summary = async {
        info!(
            "Starting report: {} symbols, {:?} selection, {}{}",
            config.sample_size,
            config.strategy,
            config.language,
            if config.dry_run { ", dry run" } else { "" }
        );

        let job = ReportJob::new(Collaborators::from_config(&config)?, &config)?;
        let summary = job.run().await?;

        info!("Report finished with {} symbols", summary.reported.len());
        anyhow::Ok(summary)
    }
    .instrument(span)
    .await?;

    print_summary(&summary);
    Ok(())
}
