//! 규칙 기반 해설.

use async_trait::async_trait;

use super::NarrativeGenerator;
use crate::insight::AssetInsight;

/// 규칙 기반 해설 생성기.
///
/// 밸류에이션, 성과 추세, 52주 위치, 변동성, 재무 건전성 순서로 문장을 붙입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedNarrator;

impl RuleBasedNarrator {
    pub fn new() -> Self {
        Self
    }

    /// 동기 버전 (LLM 실패 시 대체 문장으로도 사용).
    pub fn narrate(&self, insight: &AssetInsight) -> String {
        let ticker = &insight.ticker;
        let mut sentences = Vec::new();

        if let Some(pe) = insight.pe_ratio() {
            if pe > 30.0 {
                sentences.push(format!(
                    "High P/E ratio ({:.2}) suggests the stock may be overvalued relative to earnings.",
                    pe
                ));
            } else if pe < 15.0 {
                sentences.push(format!(
                    "Low P/E ratio ({:.2}) indicates the stock may be undervalued.",
                    pe
                ));
            } else {
                sentences.push(format!(
                    "P/E ratio ({:.2}) appears reasonable relative to the market.",
                    pe
                ));
            }
        }

        let return_5y = insight.five_year.map(|s| s.total_return_pct).unwrap_or(0.0);
        let return_1y = insight.one_year.map(|s| s.total_return_pct).unwrap_or(0.0);

        if return_5y > 100.0 {
            sentences.push(format!(
                "Strong 5-year performance with {:.1}% total return.",
                return_5y
            ));
        } else if return_5y < 0.0 {
            sentences.push(format!(
                "Negative 5-year return ({:.1}%) indicates underperformance.",
                return_5y
            ));
        }

        if return_1y > return_5y / 5.0 {
            sentences.push(format!(
                "Recent 1-year performance ({:.1}%) exceeds 5-year average, showing positive momentum.",
                return_1y
            ));
        } else if return_1y < 0.0 && return_5y > 0.0 {
            sentences.push(format!(
                "Recent 1-year decline ({:.1}%) contrasts with positive 5-year trend, potential buying opportunity.",
                return_1y
            ));
        }

        if let Some(position) = insight.price_position() {
            if position > 80.0 {
                sentences.push(format!(
                    "Stock is trading near 52-week high ({:.1}% of range), may be overbought.",
                    position
                ));
            } else if position < 20.0 {
                sentences.push(format!(
                    "Stock is trading near 52-week low ({:.1}% of range), potential value opportunity.",
                    position
                ));
            }
        }

        if let Some(volatility) = insight.five_year.map(|s| s.volatility_pct) {
            if volatility > 30.0 {
                sentences.push(format!(
                    "High volatility ({:.1}%) indicates significant price swings, suitable for risk-tolerant investors.",
                    volatility
                ));
            } else if volatility < 15.0 {
                sentences.push(format!(
                    "Low volatility ({:.1}%) suggests relatively stable price movements.",
                    volatility
                ));
            }
        }

        match insight.fundamentals.debt_to_equity.filter(|d| *d != 0.0) {
            Some(de) if de > 1.0 => sentences.push(format!(
                "High debt-to-equity ratio ({:.2}) may indicate financial risk.",
                de
            )),
            Some(de) if de < 0.5 => sentences.push(format!(
                "Low debt-to-equity ratio ({:.2}) suggests strong financial health.",
                de
            )),
            _ => {}
        }

        if sentences.is_empty() {
            return format!(
                "{} analysis: Mixed signals. Consider reviewing detailed financial statements and recent news.",
                ticker
            );
        }
        format!("{} Analysis: {}", ticker, sentences.join(" "))
    }
}

#[async_trait]
impl NarrativeGenerator for RuleBasedNarrator {
    fn name(&self) -> &str {
        "rule_based"
    }

    async fn summarize(&self, insight: &AssetInsight) -> String {
        self.narrate(insight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::HorizonStats;
    use portfo_core::AssetProfile;

    fn bare(ticker: &str) -> AssetInsight {
        AssetInsight::build(&AssetProfile::minimal(ticker, "USD"), None, None)
    }

    fn stats(total: f64, volatility: f64) -> Option<HorizonStats> {
        Some(HorizonStats {
            total_return_pct: total,
            volatility_pct: volatility,
            max_drawdown_pct: -10.0,
        })
    }

    #[test]
    fn test_mixed_signals_when_nothing_known() {
        let text = RuleBasedNarrator::new().narrate(&bare("XYZ"));
        assert!(text.starts_with("XYZ analysis: Mixed signals."));
    }

    #[test]
    fn test_valuation_and_momentum() {
        let mut insight = bare("AAPL");
        insight.fundamentals.pe_ratio = Some(35.0);
        insight.five_year = stats(150.0, 28.0);
        insight.one_year = stats(40.0, 25.0);

        let text = RuleBasedNarrator::new().narrate(&insight);
        assert!(text.starts_with("AAPL Analysis: High P/E ratio (35.00)"));
        assert!(text.contains("Strong 5-year performance with 150.0% total return."));
        assert!(text.contains("showing positive momentum"));
        assert!(!text.contains("volatility"));
    }

    #[test]
    fn test_decline_against_positive_trend() {
        let mut insight = bare("RY.TO");
        insight.five_year = stats(30.0, 12.0);
        insight.one_year = stats(-5.0, 14.0);
        insight.fundamentals.debt_to_equity = Some(2.5);

        let text = RuleBasedNarrator::new().narrate(&insight);
        assert!(text.contains("Recent 1-year decline (-5.0%)"));
        assert!(text.contains("Low volatility (12.0%)"));
        assert!(text.contains("High debt-to-equity ratio (2.50)"));
    }

    #[tokio::test]
    async fn test_trait_has_no_outlook() {
        let narrator = RuleBasedNarrator::new();
        assert!(narrator.portfolio_outlook(&[]).await.is_none());
        assert_eq!(narrator.summarize(&bare("A")).await, narrator.narrate(&bare("A")));
    }
}
