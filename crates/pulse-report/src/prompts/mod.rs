//! Report prompt assembly
//!
//! Templates live in [`templates`]; [`ReportPrompts`] feeds them structured
//! records and stitches the results into the posted messages and the LLM
//! prompts. Nothing here touches the network.

pub mod format;
pub mod templates;

use crate::error::Result;
use crate::model::{Fundamentals, SymbolStat};
use crate::news::NewsDigest;
use format::{NOT_AVAILABLE, format_large_number, format_percent, format_ratio};
use pulse_prompt::{Language, PromptRegistry};
use serde_json::json;

/// Longest forecast the model is asked to write, in characters
pub const FORECAST_MAX_CHARS: usize = 1000;

/// Register every report template with the given registry
pub fn register_prompts(registry: &mut PromptRegistry) -> pulse_prompt::Result<()> {
    registry
        .register(templates::stat_summary()?)
        .register(templates::financial_summary()?)
        .register(templates::company_heading()?)
        .register(templates::company_prompt()?)
        .register(templates::forecast_instructions()?)
        .register(templates::news_lead()?);
    Ok(())
}

/// Renders report messages and prompts in one language
#[derive(Debug)]
pub struct ReportPrompts {
    registry: PromptRegistry,
    news_items: usize,
}

impl ReportPrompts {
    /// `news_items` is the per-section size of the news digest
    pub fn new(language: Language, news_items: usize) -> Result<Self> {
        let mut registry = PromptRegistry::new(language);
        register_prompts(&mut registry)?;
        Ok(Self {
            registry,
            news_items,
        })
    }

    pub fn language(&self) -> Language {
        self.registry.language()
    }

    /// `# Security (SYM)` followed by the three return lines
    pub fn stat_summary(&self, stat: &SymbolStat) -> Result<String> {
        Ok(self.registry.render(
            templates::STAT_SUMMARY,
            &json!({
                "security": stat.security_name,
                "symbol": stat.symbol,
                "latest_return": stat.latest_return,
                "monthly_return": stat.monthly_return,
                "monthly_sigma": stat.monthly_sigma,
            }),
        )?)
    }

    pub fn financial_summary(&self, fundamentals: &Fundamentals) -> Result<String> {
        let lang = self.language();
        Ok(self.registry.render(
            templates::FINANCIAL_SUMMARY,
            &json!({
                "market_cap": format_large_number(fundamentals.market_cap, lang),
                "total_revenue": format_large_number(fundamentals.total_revenue, lang),
                "gross_margins": format_percent(fundamentals.gross_margins),
                "debt_to_equity": format_ratio(fundamentals.debt_to_equity()),
                "trailing_pe": format_ratio(fundamentals.trailing_pe),
                "price_to_book": format_ratio(fundamentals.price_to_book),
            }),
        )?)
    }

    /// First message of a symbol: statistics then fundamentals
    pub fn overview(&self, stat: &SymbolStat, fundamentals: &Fundamentals) -> Result<String> {
        Ok(format!(
            "{}\n\n{}",
            self.stat_summary(stat)?,
            self.financial_summary(fundamentals)?
        ))
    }

    /// Prompt asking the model for a short company description
    pub fn company_prompt(&self, symbol: &str, fundamentals: &Fundamentals) -> Result<String> {
        let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Ok(self.registry.render(
            templates::COMPANY_PROMPT,
            &json!({
                "name": fundamentals.short_name.as_deref().unwrap_or(symbol),
                "sector": or_na(&fundamentals.sector),
                "industry": or_na(&fundamentals.industry),
                "summary": or_na(&fundamentals.business_summary),
            }),
        )?)
    }

    /// Prefix the model's company description with its heading
    pub fn company_message(&self, description: &str) -> Result<String> {
        let heading = self.registry.render(templates::COMPANY_HEADING, &json!({}))?;
        Ok(format!("{heading}\n{}", description.trim()))
    }

    /// Instructions, statistics block, news lead-in and digest, in that order
    pub fn forecast_prompt(&self, stat: &SymbolStat, digest: &NewsDigest) -> Result<String> {
        let instructions = self.registry.render(
            templates::FORECAST_INSTRUCTIONS,
            &json!({
                "max_news": self.news_items,
                "comments": 3,
                "max_chars": FORECAST_MAX_CHARS,
            }),
        )?;
        let lead = self.registry.render(templates::NEWS_LEAD, &json!({}))?;

        Ok(format!(
            "{instructions}\n\n{}\n\n{lead}\n{}",
            self.stat_summary(stat)?,
            digest.render()
        ))
    }
}
