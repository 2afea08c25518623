//! 단일 종목 가격 이력 명령어.

use anyhow::Result;

use portfo_analytics::{AssetHistory, PortfolioAnalyzer};
use portfo_core::{Currency, Period};

/// 최근 며칠만 표에 표시합니다.
const RECENT_ROWS: usize = 10;

/// history 명령 설정.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub ticker: String,
    pub period: Period,
    /// 보고 통화 (없으면 종목의 원래 통화)
    pub currency: Option<Currency>,
}

/// 가격 이력 조회.
pub async fn history(analyzer: &PortfolioAnalyzer, config: HistoryConfig) -> Result<AssetHistory> {
    Ok(analyzer
        .asset_history(&config.ticker, config.period, config.currency)
        .await?)
}

/// 이력 요약과 최근 관측값을 표 형식으로 만듭니다.
pub fn render_history(history: &AssetHistory) -> String {
    let meta = &history.metadata;
    let mut lines = vec![
        format!("{} - {} ({})", history.ticker, meta.name, meta.exchange),
        format!("  기간             {} ~ {} ({})", meta.start_date, meta.end_date, history.period),
        format!("  통화             {} (원래 통화 {})", meta.currency, meta.native_currency),
        format!("  총 수익률        {:+.2}%", meta.total_return_pct),
        format!("  평균 일간 수익률 {:+.4}%", meta.avg_daily_return_pct),
        format!("  일간 변동성      {:.4}%", meta.volatility_pct),
        format!("  관측 수          {}", meta.data_points),
        String::new(),
        format!("{:<12} {:>12} {:>10} {:>10}", "날짜", "수정 종가", "일간", "누적"),
    ];

    let skip = history.data.len().saturating_sub(RECENT_ROWS);
    for point in history.data.iter().skip(skip) {
        lines.push(format!(
            "{:<12} {:>12.2} {:>+9.2}% {:>+9.2}%",
            point.date.to_string(),
            point.adjusted_close,
            point.daily_return,
            point.cumulative_performance
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate};
    use portfo_core::PriceSeries;
    use portfo_data::{InMemoryMarketDataProvider, StaticFxRateProvider};

    fn analyzer() -> PortfolioAnalyzer {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let series = PriceSeries::from_observations(
            "RY.TO",
            "CAD",
            (0..15).map(|i| (start + Duration::days(i), 100.0 + i as f64)),
        );
        PortfolioAnalyzer::new(
            Arc::new(InMemoryMarketDataProvider::new().with_series(series)),
            Arc::new(StaticFxRateProvider::new()),
        )
    }

    #[tokio::test]
    async fn test_history_resolves_and_renders() {
        let config = HistoryConfig {
            ticker: "ry".to_string(),
            period: Period::OneYear,
            currency: None,
        };
        let history = history(&analyzer(), config).await.unwrap();
        assert_eq!(history.ticker, "RY.TO");
        assert_eq!(history.metadata.currency, "CAD");
        assert_eq!(history.data.len(), 15);

        let text = render_history(&history);
        assert!(text.starts_with("RY.TO"));
        assert!(text.contains("+14.00%"));
        // 헤더 + 요약 + 최근 10행
        assert_eq!(text.lines().count(), 9 + RECENT_ROWS);
    }

    #[tokio::test]
    async fn test_history_converts_currency() {
        let config = HistoryConfig {
            ticker: "RY.TO".to_string(),
            period: Period::OneYear,
            currency: Some(Currency::Usd),
        };
        let history = history(&analyzer(), config).await.unwrap();
        assert_eq!(history.metadata.currency, "USD");
        assert_eq!(history.metadata.native_currency, "CAD");
        assert!((history.data[0].adjusted_close - 74.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_history_unknown_ticker() {
        let config = HistoryConfig {
            ticker: "NOPE".to_string(),
            period: Period::OneYear,
            currency: None,
        };
        assert!(history(&analyzer(), config).await.is_err());
    }
}
