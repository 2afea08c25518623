//! 메모리 기반 시장 데이터 제공자.
//!
//! 네트워크 없이 분석 파이프라인을 실행할 때(테스트, 데모) 사용합니다.
//! 티커 해석 규칙은 Yahoo 제공자와 같아서 `RY` 요청이 `RY.TO` 시계열로
//! 해석되는 동작도 재현됩니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use portfo_core::{AssetProfile, MarketDataProvider, Period, PriceSeries, ProviderError};

use super::ticker::ticker_candidates;

/// 메모리 기반 제공자.
#[derive(Default)]
pub struct InMemoryMarketDataProvider {
    series: HashMap<String, PriceSeries>,
    profiles: HashMap<String, AssetProfile>,
    failures: HashMap<String, ProviderError>,
    fetches: AtomicUsize,
}

impl InMemoryMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 시계열 등록. 키는 시계열의 심볼입니다.
    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.symbol().to_uppercase(), series);
        self
    }

    /// 종목 정보 등록.
    pub fn with_profile(mut self, profile: AssetProfile) -> Self {
        self.profiles.insert(profile.symbol.to_uppercase(), profile);
        self
    }

    /// 특정 심볼 조회 시 반환할 에러 등록.
    pub fn with_failure(mut self, symbol: &str, error: ProviderError) -> Self {
        self.failures.insert(symbol.to_uppercase(), error);
        self
    }

    /// 지금까지 `fetch_history` 호출 횟수.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn lookup(&self, ticker: &str) -> Result<&PriceSeries, ProviderError> {
        for symbol in ticker_candidates(ticker) {
            if let Some(err) = self.failures.get(&symbol) {
                return Err(err.clone());
            }
            if let Some(series) = self.series.get(&symbol) {
                if !series.is_empty() {
                    return Ok(series);
                }
            }
        }
        Err(ProviderError::NotFound(ticker.to_string()))
    }
}

/// 마지막 관측일 기준으로 기간 밖의 관측값을 잘라냅니다.
fn window(series: &PriceSeries, period: Period) -> PriceSeries {
    let Some(last) = series.last() else {
        return series.clone();
    };
    let cutoff = last.date - Duration::days(period.days());
    PriceSeries::from_observations(
        series.symbol(),
        series.currency(),
        series
            .points()
            .iter()
            .filter(|p| p.date >= cutoff)
            .map(|p| (p.date, p.value)),
    )
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketDataProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_history(&self, ticker: &str, period: Period) -> Result<PriceSeries, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.lookup(ticker).map(|series| window(series, period))
    }

    async fn fetch_profile(&self, ticker: &str) -> Result<AssetProfile, ProviderError> {
        for symbol in ticker_candidates(ticker) {
            if let Some(profile) = self.profiles.get(&symbol) {
                return Ok(profile.clone());
            }
        }
        let series = self.lookup(ticker)?;
        let mut profile = AssetProfile::minimal(series.symbol(), series.currency());
        profile.fundamentals.current_price = series.last().map(|p| p.value);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(symbol: &str, currency: &str, days: u32) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        PriceSeries::from_observations(
            symbol,
            currency,
            (0..days).map(|i| (start + Duration::days(i as i64), 100.0 + i as f64)),
        )
    }

    #[tokio::test]
    async fn test_resolves_tsx_suffix() {
        let provider = InMemoryMarketDataProvider::new().with_series(series("RY.TO", "CAD", 10));
        let fetched = provider.fetch_history("ry", Period::OneYear).await.unwrap();
        assert_eq!(fetched.symbol(), "RY.TO");
        assert_eq!(fetched.currency(), "CAD");
        assert_eq!(provider.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_resolves_index_alias() {
        let provider = InMemoryMarketDataProvider::new().with_series(series("^GSPC", "USD", 5));
        let fetched = provider.fetch_history("SP500", Period::OneYear).await.unwrap();
        assert_eq!(fetched.symbol(), "^GSPC");
    }

    #[tokio::test]
    async fn test_period_window() {
        let provider = InMemoryMarketDataProvider::new().with_series(series("AAA", "USD", 800));
        let one_year = provider.fetch_history("AAA", Period::OneYear).await.unwrap();
        assert_eq!(one_year.len(), 366);
        let five_years = provider.fetch_history("AAA", Period::FiveYears).await.unwrap();
        assert_eq!(five_years.len(), 800);
    }

    #[tokio::test]
    async fn test_failure_and_missing() {
        let provider = InMemoryMarketDataProvider::new()
            .with_failure("BAD", ProviderError::Network("reset".to_string()));
        let err = provider.fetch_history("bad", Period::OneYear).await.unwrap_err();
        assert!(err.is_retryable());

        let err = provider.fetch_history("NONE", Period::OneYear).await.unwrap_err();
        assert_eq!(err, ProviderError::NotFound("NONE".to_string()));
    }

    #[tokio::test]
    async fn test_profile_falls_back_to_series() {
        let provider = InMemoryMarketDataProvider::new().with_series(series("AAA", "USD", 3));
        let profile = provider.fetch_profile("aaa").await.unwrap();
        assert_eq!(profile.symbol, "AAA");
        assert_eq!(profile.fundamentals.current_price, Some(102.0));
    }
}
