//! Report and prompt templates in English and Japanese

use pulse_prompt::{JinjaTemplate, Result};

pub const STAT_SUMMARY: &str = "report.stat_summary";
pub const FINANCIAL_SUMMARY: &str = "report.financial_summary";
pub const COMPANY_HEADING: &str = "report.company_heading";
pub const COMPANY_PROMPT: &str = "llm.company_summary";
pub const FORECAST_INSTRUCTIONS: &str = "llm.forecast_instructions";
pub const NEWS_LEAD: &str = "llm.news_lead";

// ============================================================================
// Posted messages
// ============================================================================

/// Header and return statistics of one symbol
pub fn stat_summary() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        STAT_SUMMARY,
        "# {{ security }} ({{ symbol }})
- Latest 1-day return: {{ latest_return | percent }}
- Past 1-month return: {{ monthly_return | percent }}
- 1-sigma range of the 1-month return: ±{{ monthly_sigma | percent }}",
        "# {{ security }} ({{ symbol }})
- 直近1日のリターン: {{ latest_return | percent }}
- 過去1ヶ月のリターン: {{ monthly_return | percent }}
- 1ヶ月リターンの1sigma範囲: ±{{ monthly_sigma | percent }}",
    )
}

/// Key fundamentals; every value arrives preformatted
pub fn financial_summary() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        FINANCIAL_SUMMARY,
        "## Financials
- Market cap: {{ market_cap }}
- Revenue: {{ total_revenue }}
- Gross margin: {{ gross_margins }}
- Debt-to-equity: {{ debt_to_equity }}
- Trailing P/E: {{ trailing_pe }}
- Price-to-book: {{ price_to_book }}",
        "## 財務情報
- 時価総額 (Market Cap): {{ market_cap }}
- 売上高 (Revenue): {{ total_revenue }}
- 売上総利益率 (Gross Margins): {{ gross_margins }}
- 負債資本比率 (Debt-to-Equity): {{ debt_to_equity }}
- PER (Trailing P/E): {{ trailing_pe }}
- PBR (Price-to-Book Ratio): {{ price_to_book }}",
    )
}

/// Heading placed above the company summary
pub fn company_heading() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(COMPANY_HEADING, "## Business summary", "## 事業内容")
}

// ============================================================================
// LLM prompts
// ============================================================================

/// Ask for a three-bullet company description
pub fn company_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        COMPANY_PROMPT,
        "Below is the business description of {{ name }}. Summarize the business in three short bullet points.
- Sector: {{ sector }}
- Industry: {{ industry }}
- Business: {{ summary }}",
        "以下は{{ name }}の事業内容です。事業内容を3つの簡単な箇条書きで記載してください。
- 業種: {{ sector }}
- 産業: {{ industry }}
- 事業内容: {{ summary }}",
    )
}

/// Output format and length rules for the forecast
pub fn forecast_instructions() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        FORECAST_INSTRUCTIONS,
        "The following is information about an S&P 500 stock.
Relate it to the news and forecast how the stock may move from here.
When you use a news item, cite its title, source, publication time and URL.
Answer in the format below.
List at most {{ max_news }} related news items.
Give {{ comments }} short comments on the outlook.
Keep the whole answer under {{ max_chars }} characters.

## Analysis of the figures
Example: the 1-month return is well above the 1-sigma range, showing an unusually strong rise.
## Related news
1. [News title, published at](URL)
Summary of the news
## Outlook
- Short comment",
        "以下は、S&P500の株式に関する情報です。
ニュースと関連付けて、今後の動向について予測してください。
ニュースの情報を利用する際は、参照したニュースのタイトル、ソース、公開日時、URLを明記してください。
以下のフォーマットで回答してください。
関連ニュースは{{ max_news }}つまで記載してください。
今後の動向については、簡単なコメントを{{ comments }}つ記載してください。
全体で{{ max_chars }}文字は超えないようにしてください。

## 数値情報の分析
例: 過去1ヶ月のリターンは、1シグマ範囲を大きく上回っており、非常に高い上昇を示している。
## 関連ニュース
1. [ニュースタイトル, 発行日時](URL)
ニュースの要約
## 今後の動向について
- 短いコメント",
    )
}

/// Lead-in placed before the news digest
pub fn news_lead() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        NEWS_LEAD,
        "Related news follows.",
        "以下は関連するニュースです。",
    )
}
