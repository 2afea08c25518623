//! 단일 자산 가격 이력 분석.
//!
//! 일별 `{수정 종가, 일간 수익률 %, 누적 성과 %}`와 요약 메타데이터를 만듭니다.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use portfo_core::{round_to, AssetProfile, Period, PriceSeries};

use crate::performance::{mean, pct_change, sample_std};

/// 하루치 이력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    /// 수정 종가 (보고 통화)
    pub adjusted_close: f64,
    /// 전일 대비 수익률 (%), 첫날은 0
    pub daily_return: f64,
    /// 첫날 대비 누적 성과 (%)
    pub cumulative_performance: f64,
}

/// 이력 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMetadata {
    /// 조회에 사용된 심볼
    pub ticker: String,
    pub name: String,
    pub exchange: String,
    /// 보고 통화
    pub currency: String,
    /// 원래 통화
    pub native_currency: String,
    pub sector: String,
    pub industry: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 총 수익률 (%, 소수 둘째 자리)
    pub total_return_pct: f64,
    /// 평균 일간 수익률 (%, 소수 넷째 자리)
    pub avg_daily_return_pct: f64,
    /// 일간 수익률(%)의 표본 표준편차 (소수 넷째 자리)
    pub volatility_pct: f64,
    pub data_points: usize,
}

/// 단일 자산 이력 응답.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHistory {
    pub ticker: String,
    pub period: Period,
    pub data: Vec<HistoryPoint>,
    pub metadata: HistoryMetadata,
}

/// 배치 조회의 종목별 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub ticker: String,
    pub period: Period,
    pub data: Vec<HistoryPoint>,
    pub data_points: usize,
}

/// 배치 이력 응답.
///
/// `results`는 조회된 심볼, `errors`는 요청 티커를 키로 사용합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchHistory {
    pub results: BTreeMap<String, BatchEntry>,
    pub errors: BTreeMap<String, String>,
    pub success_count: usize,
    pub error_count: usize,
}

impl BatchHistory {
    pub fn push_result(&mut self, entry: BatchEntry) {
        self.results.insert(entry.ticker.clone(), entry);
        self.success_count = self.results.len();
    }

    pub fn push_error(&mut self, ticker: impl Into<String>, reason: impl Into<String>) {
        self.errors.insert(ticker.into(), reason.into());
        self.error_count = self.errors.len();
    }
}

/// 가격 시계열을 일별 이력으로 변환합니다.
pub fn history_points(series: &PriceSeries) -> Vec<HistoryPoint> {
    let Some(first) = series.first().map(|p| p.value) else {
        return Vec::new();
    };

    let mut previous: Option<f64> = None;
    series
        .points()
        .iter()
        .map(|p| {
            let daily_return = previous.map(|prev| (p.value / prev - 1.0) * 100.0).unwrap_or(0.0);
            previous = Some(p.value);
            HistoryPoint {
                date: p.date,
                adjusted_close: p.value,
                daily_return,
                cumulative_performance: (p.value / first - 1.0) * 100.0,
            }
        })
        .collect()
}

/// 이력 요약 메타데이터를 만듭니다. 시계열이 비면 `None`.
pub fn history_metadata(
    series: &PriceSeries,
    native_currency: &str,
    profile: &AssetProfile,
) -> Option<HistoryMetadata> {
    let first = series.first()?;
    let last = series.last()?;
    let daily_pct: Vec<f64> = pct_change(&series.values())
        .into_iter()
        .map(|r| r * 100.0)
        .collect();

    Some(HistoryMetadata {
        ticker: series.symbol().to_string(),
        name: profile.display_name().to_string(),
        exchange: profile.exchange.clone().unwrap_or_else(|| "Unknown".to_string()),
        currency: series.currency().to_string(),
        native_currency: native_currency.to_string(),
        sector: profile.sector.clone().unwrap_or_else(|| "N/A".to_string()),
        industry: profile.industry.clone().unwrap_or_else(|| "N/A".to_string()),
        start_date: first.date,
        end_date: last.date,
        total_return_pct: round_to((last.value / first.value - 1.0) * 100.0, 2),
        avg_daily_return_pct: round_to(mean(&daily_pct), 4),
        volatility_pct: round_to(sample_std(&daily_pct), 4),
        data_points: series.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn series() -> PriceSeries {
        PriceSeries::from_observations(
            "RY.TO",
            "CAD",
            vec![(d(1), 100.0), (d(2), 110.0), (d(3), 99.0)],
        )
    }

    #[test]
    fn test_history_points() {
        let points = history_points(&series());
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].daily_return, 0.0);
        assert_eq!(points[0].cumulative_performance, 0.0);
        assert!((points[1].daily_return - 10.0).abs() < 1e-9);
        assert!((points[2].daily_return + 10.0).abs() < 1e-9);
        assert!((points[2].cumulative_performance + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_metadata() {
        let mut profile = AssetProfile::minimal("RY.TO", "CAD");
        profile.name = Some("Royal Bank of Canada".to_string());
        let meta = history_metadata(&series(), "CAD", &profile).unwrap();

        assert_eq!(meta.ticker, "RY.TO");
        assert_eq!(meta.name, "Royal Bank of Canada");
        assert_eq!(meta.exchange, "Unknown");
        assert_eq!(meta.sector, "N/A");
        assert_eq!(meta.start_date, d(1));
        assert_eq!(meta.end_date, d(3));
        assert_eq!(meta.total_return_pct, -1.0);
        assert_eq!(meta.avg_daily_return_pct, 0.0);
        assert_eq!(meta.volatility_pct, 14.1421);
        assert_eq!(meta.data_points, 3);
    }

    #[test]
    fn test_empty_series() {
        let empty = PriceSeries::from_observations("X", "USD", Vec::new());
        assert!(history_points(&empty).is_empty());
        assert!(history_metadata(&empty, "USD", &AssetProfile::minimal("X", "USD")).is_none());
    }

    #[test]
    fn test_batch_counts() {
        let mut batch = BatchHistory::default();
        batch.push_error("NOPE", "no data");
        batch.push_result(BatchEntry {
            ticker: "AAPL".to_string(),
            period: Period::OneYear,
            data: Vec::new(),
            data_points: 0,
        });
        assert_eq!(batch.success_count, 1);
        assert_eq!(batch.error_count, 1);
    }
}
