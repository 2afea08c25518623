//! Chat Completions 기반 해설 생성기.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use portfo_core::NarrativeConfig;

use super::{NarrativeGenerator, RuleBasedNarrator};
use crate::insight::{AssetInsight, Recommendation};

const ANALYST_PROMPT: &str = "You are a financial analyst providing clear, concise investment \
recommendations. Always base your analysis on the provided data and highlight specific metrics.";

const SUMMARY_PROMPT: &str = "You are a financial analyst providing concise portfolio summaries.";

/// 전체 전망 요청 최대 토큰.
const SUMMARY_MAX_TOKENS: u32 = 200;

/// 전망 프롬프트에 넣을 종목별 해설 최대 글자 수.
const SUMMARY_EXCERPT_CHARS: usize = 200;

/// LLM 호출 에러.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API 에러 (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("응답에 내용이 없습니다")]
    EmptyResponse,

    #[error("API 키가 설정되지 않았습니다")]
    MissingCredential,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat Completions 호환 API를 호출하는 해설 생성기.
///
/// 호출이 실패하면 [`RuleBasedNarrator`] 문장을 반환합니다.
pub struct OpenAiNarrator {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    fallback: RuleBasedNarrator,
}

impl OpenAiNarrator {
    /// 설정에서 생성합니다.
    pub fn from_config(config: &NarrativeConfig) -> Result<Self, NarrativeError> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|key| SecretString::new(key.expose_secret().into()))
            .ok_or(NarrativeError::MissingCredential)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            fallback: RuleBasedNarrator::new(),
        })
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, NarrativeError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(NarrativeError::EmptyResponse)
    }
}

#[async_trait]
impl NarrativeGenerator for OpenAiNarrator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn summarize(&self, insight: &AssetInsight) -> String {
        let prompt = analysis_prompt(insight);
        match self.complete(ANALYST_PROMPT, &prompt, self.max_tokens).await {
            Ok(text) => {
                debug!(ticker = %insight.ticker, "LLM 해설 생성 완료");
                text
            }
            Err(e) => {
                warn!(ticker = %insight.ticker, error = %e, "LLM 해설 실패, 규칙 기반 해설 사용");
                self.fallback.narrate(insight)
            }
        }
    }

    async fn portfolio_outlook(&self, recommendations: &[Recommendation]) -> Option<String> {
        if recommendations.len() < 2 {
            return None;
        }

        let lines: Vec<String> = recommendations
            .iter()
            .map(|r| {
                let excerpt: String = r.recommendation.chars().take(SUMMARY_EXCERPT_CHARS).collect();
                format!("{}: {}...", r.ticker, excerpt)
            })
            .collect();
        let prompt = format!(
            "Summarize the following stock recommendations in 2-3 sentences, highlighting the overall portfolio outlook:\n\n{}",
            lines.join("\n")
        );

        match self.complete(SUMMARY_PROMPT, &prompt, SUMMARY_MAX_TOKENS).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "전체 전망 생성 실패");
                None
            }
        }
    }
}

fn ratio(value: Option<f64>) -> String {
    match value.filter(|v| *v != 0.0) {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

fn percent(value: Option<f64>) -> String {
    match value.filter(|v| *v != 0.0) {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "N/A".to_string(),
    }
}

/// 종목 분석 프롬프트.
fn analysis_prompt(insight: &AssetInsight) -> String {
    let f = &insight.fundamentals;
    let five = insight.five_year;
    let one = insight.one_year;

    format!(
        "Analyze the following stock data and provide a plain-English investment recommendation.

Stock: {name} ({ticker})
Sector: {sector}
Industry: {industry}

Current Metrics:
- Current Price: ${price:.2}
- P/E Ratio: {pe}
- P/B Ratio: {pb}
- Market Cap: ${market_cap:.0}
- Dividend Yield: {dividend:.2}%
- Beta: {beta:.2}

Performance:
- 5-Year Total Return: {r5:.2}%
- 5-Year Volatility: {v5:.2}%
- 1-Year Total Return: {r1:.2}%
- Maximum Drawdown (5Y): {dd5:.2}%

Financial Health:
- Debt to Equity: {de}
- Profit Margins: {margins}
- Revenue Growth: {revenue}
- Earnings Growth: {earnings}

Price Position:
- 52-Week High: ${high:.2}
- 52-Week Low: ${low:.2}
- Current Price Position: {position:.1}% of 52-week range

Please provide:
1. A concise investment recommendation (2-3 sentences)
2. Key insights about valuation, performance trends, and financial health
3. Whether the stock appears overvalued, undervalued, or fairly valued
4. Any notable patterns or risks

Be specific and reference the actual numbers in your analysis.",
        name = insight.company_name,
        ticker = insight.ticker,
        sector = insight.sector.as_deref().unwrap_or("Unknown"),
        industry = insight.industry.as_deref().unwrap_or("Unknown"),
        price = f.current_price.unwrap_or(0.0),
        pe = ratio(f.pe_ratio),
        pb = ratio(f.pb_ratio),
        market_cap = f.market_cap.unwrap_or(0.0),
        dividend = f.dividend_yield.unwrap_or(0.0) * 100.0,
        beta = f.beta.unwrap_or(1.0),
        r5 = five.map(|s| s.total_return_pct).unwrap_or(0.0),
        v5 = five.map(|s| s.volatility_pct).unwrap_or(0.0),
        r1 = one.map(|s| s.total_return_pct).unwrap_or(0.0),
        dd5 = five.map(|s| s.max_drawdown_pct).unwrap_or(0.0),
        de = ratio(f.debt_to_equity),
        margins = percent(f.profit_margins),
        revenue = percent(f.revenue_growth),
        earnings = percent(f.earnings_growth),
        high = f.fifty_two_week_high.unwrap_or(0.0),
        low = f.fifty_two_week_low.unwrap_or(0.0),
        position = insight.price_position().unwrap_or(0.0),
    )
}
