//! 환율 조회 명령어.

use anyhow::Result;

use portfo_analytics::{FxQuote, PortfolioAnalyzer, RateSource};

/// 현재 환율 조회. 제공자가 실패하면 고정 대체 환율입니다.
pub async fn fx_rate(analyzer: &PortfolioAnalyzer, from: &str, to: &str) -> Result<FxQuote> {
    Ok(analyzer.fx_quote(from, to).await?)
}

pub fn render_quote(quote: &FxQuote) -> String {
    let source = match quote.source {
        RateSource::Identity => "같은 통화",
        RateSource::Provider => "실시간",
        RateSource::Fallback => "고정 대체 환율",
    };
    format!("1 {} = {:.4} {} ({})", quote.from, quote.rate, quote.to, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use portfo_data::{InMemoryMarketDataProvider, StaticFxRateProvider};

    fn analyzer(fx: StaticFxRateProvider) -> PortfolioAnalyzer {
        PortfolioAnalyzer::new(Arc::new(InMemoryMarketDataProvider::new()), Arc::new(fx))
    }

    #[tokio::test]
    async fn test_fx_rate() {
        let quote = fx_rate(&analyzer(StaticFxRateProvider::new()), "usd", "cad")
            .await
            .unwrap();
        assert_eq!(quote.from, "USD");
        assert_eq!(quote.to, "CAD");
        assert!((quote.rate - 1.35).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_render_quote() {
        let fx = StaticFxRateProvider::new().with_rate("USD", "CAD", 1.3712);
        let quote = fx_rate(&analyzer(fx), "USD", "CAD").await.unwrap();
        assert_eq!(render_quote(&quote), "1 USD = 1.3712 CAD (실시간)");

        let identity = fx_rate(&analyzer(StaticFxRateProvider::new()), "CAD", "CAD")
            .await
            .unwrap();
        assert!((identity.rate - 1.0).abs() < 1e-12);
    }
}
