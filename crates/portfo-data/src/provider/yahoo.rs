//! Yahoo Finance 시장 데이터 제공자.
//!
//! # 조회 흐름
//!
//! ```text
//! 요청 티커
//!     │  normalize_ticker / ticker_candidates
//!     ▼
//! ┌──────────────────────┐
//! │ 1. range 조회 (1y…)   │
//! └──────────┬───────────┘
//!       비었음│
//! ┌──────────▼───────────┐
//! │ 2. 날짜 범위 재조회    │ ← now - (기간 일수 + 여유 일수)
//! └──────────┬───────────┘
//!       비었음│
//! ┌──────────▼───────────┐
//! │ 3. `.TO` 후보로 1–2 반복│
//! └──────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use yahoo_finance_api as yahoo;

use portfo_core::{AssetProfile, Fundamentals, MarketDataProvider, Period, PriceSeries, ProviderError};

use super::ticker::{guess_currency, ticker_candidates};
use crate::error::{DataError, Result};

/// 일봉 간격.
const DAILY: &str = "1d";

/// 한 심볼에 대한 원시 조회 결과.
struct RawHistory {
    series: PriceSeries,
    exchange: Option<String>,
    highs: Vec<f64>,
    lows: Vec<f64>,
}

/// Yahoo Finance 제공자.
pub struct YahooMarketDataProvider {
    connector: yahoo::YahooConnector,
    /// `get_ticker_info`는 crumb 갱신 때문에 `&mut self`가 필요
    info_connector: Mutex<yahoo::YahooConnector>,
    lookback_padding_days: i64,
}

impl YahooMarketDataProvider {
    /// 새 제공자를 생성합니다.
    pub fn new(lookback_padding_days: i64) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))?;
        let info_connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))?;
        Ok(Self {
            connector,
            info_connector: Mutex::new(info_connector),
            lookback_padding_days,
        })
    }

    /// range 파라미터로 조회.
    async fn fetch_range(&self, symbol: &str, range: &str) -> Result<RawHistory> {
        debug!(symbol, range, "Yahoo Finance range 조회");
        let response = self
            .connector
            .get_quote_range(symbol, DAILY, range)
            .await
            .map_err(|e| DataError::FetchError(format!("Yahoo Finance API 오류 ({}): {}", symbol, e)))?;
        to_raw_history(symbol, &response)
    }

    /// 날짜 범위로 조회.
    async fn fetch_window(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<RawHistory> {
        debug!(symbol, %start, %end, "Yahoo Finance 날짜 범위 조회");
        let response = self
            .connector
            .get_quote_history_interval(
                symbol,
                naive_date_to_offset_datetime(start)?,
                naive_date_to_offset_datetime(end)?,
                DAILY,
            )
            .await
            .map_err(|e| DataError::FetchError(format!("Yahoo Finance API 오류 ({}): {}", symbol, e)))?;
        to_raw_history(symbol, &response)
    }

    /// 한 심볼의 이력을 range → 날짜 범위 순서로 조회.
    async fn history_for_symbol(&self, symbol: &str, period: Period) -> Result<RawHistory> {
        match self.fetch_range(symbol, period.as_range()).await {
            Ok(raw) if !raw.series.is_empty() => return Ok(raw),
            Ok(_) => debug!(symbol, "range 조회 결과 없음"),
            Err(e) => debug!(symbol, error = %e, "range 조회 실패"),
        }

        let end = Utc::now().date_naive();
        let start = end - Duration::days(period.days() + self.lookback_padding_days);
        let raw = self.fetch_window(symbol, start, end).await?;
        if raw.series.is_empty() {
            return Err(DataError::NotFound(symbol.to_string()));
        }
        Ok(raw)
    }

    /// 후보 심볼을 순서대로 시도.
    async fn history_with_candidates(&self, ticker: &str, period: Period) -> Result<RawHistory> {
        let candidates = ticker_candidates(ticker);
        let mut last_error = DataError::NotFound(ticker.to_string());

        for (attempt, symbol) in candidates.iter().enumerate() {
            if attempt > 0 {
                warn!(requested = ticker, retry = %symbol, "데이터 없음, TSX 접미사로 재시도");
            }
            match self.history_for_symbol(symbol, period).await {
                Ok(raw) => return Ok(raw),
                Err(e) => last_error = e,
            }
        }

        Err(match last_error {
            DataError::NotFound(_) => DataError::NotFound(ticker.to_string()),
            other => other,
        })
    }

    /// 종목 정보(quote summary) 조회.
    async fn fetch_ticker_info(&self, symbol: &str) -> Result<(Option<String>, Fundamentals)> {
        let mut connector = self.info_connector.lock().await;
        let summary = connector.get_ticker_info(symbol).await.map_err(|e| {
            DataError::FetchError(format!("Yahoo ticker info 조회 실패 ({}): {}", symbol, e))
        })?;

        let quote_summary = summary
            .quote_summary
            .ok_or_else(|| DataError::NotFound(format!("ticker info 결과 없음: {}", symbol)))?;
        let result = quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::NotFound(format!("ticker info 결과 비어있음: {}", symbol)))?;

        let summary_detail = result.summary_detail.as_ref();
        let key_stats = result.default_key_statistics.as_ref();
        let financial = result.financial_data.as_ref();

        let fundamentals = Fundamentals {
            market_cap: summary_detail.and_then(|sd| sd.market_cap).map(|v| v as f64),
            pe_ratio: summary_detail
                .and_then(|sd| sd.trailing_pe)
                .or_else(|| summary_detail.and_then(|sd| sd.forward_pe))
                .or_else(|| key_stats.and_then(|ks| ks.forward_pe)),
            pb_ratio: key_stats.and_then(|ks| ks.price_to_book),
            dividend_yield: summary_detail.and_then(|sd| sd.trailing_annual_dividend_yield),
            debt_to_equity: financial.and_then(|fd| fd.debt_to_equity),
            profit_margins: financial.and_then(|fd| fd.profit_margins),
            revenue_growth: financial.and_then(|fd| fd.revenue_growth),
            earnings_growth: financial.and_then(|fd| fd.earnings_growth),
            ..Default::default()
        };

        let name = result
            .quote_type
            .as_ref()
            .and_then(|qt| qt.long_name.clone().or(qt.short_name.clone()));

        Ok((name, fundamentals))
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    #[instrument(skip(self))]
    async fn fetch_history(
        &self,
        ticker: &str,
        period: Period,
    ) -> std::result::Result<PriceSeries, ProviderError> {
        let raw = self.history_with_candidates(ticker, period).await?;
        info!(
            requested = ticker,
            resolved = raw.series.symbol(),
            points = raw.series.len(),
            currency = raw.series.currency(),
            "가격 이력 조회 완료"
        );
        Ok(raw.series)
    }

    #[instrument(skip(self))]
    async fn fetch_profile(&self, ticker: &str) -> std::result::Result<AssetProfile, ProviderError> {
        let raw = self.history_with_candidates(ticker, Period::OneYear).await?;
        let symbol = raw.series.symbol().to_string();

        let mut profile = AssetProfile::minimal(symbol.clone(), raw.series.currency());
        profile.exchange = raw.exchange;

        match self.fetch_ticker_info(&symbol).await {
            Ok((name, fundamentals)) => {
                profile.name = name;
                profile.fundamentals = fundamentals;
            }
            Err(e) => warn!(symbol = %symbol, error = %e, "ticker info 조회 실패, 시세 정보만 사용"),
        }

        let f = &mut profile.fundamentals;
        f.current_price = raw.series.last().map(|p| p.value);
        f.fifty_two_week_high = raw.highs.iter().copied().reduce(f64::max);
        f.fifty_two_week_low = raw.lows.iter().copied().reduce(f64::min);

        Ok(profile)
    }
}

/// Yahoo 응답을 가격 시계열로 변환합니다 (수정 종가 우선).
fn to_raw_history(symbol: &str, response: &yahoo::YResponse) -> Result<RawHistory> {
    let quotes = response
        .quotes()
        .map_err(|e| DataError::ParseError(format!("Quote 파싱 오류: {}", e)))?;

    let (currency, exchange) = match response.metadata() {
        Ok(meta) => (
            meta.currency.clone().unwrap_or_else(|| guess_currency(symbol).to_string()),
            Some(meta.exchange_name.clone()),
        ),
        Err(e) => {
            warn!(symbol, error = %e, "메타데이터 조회 실패, 통화 추정");
            (guess_currency(symbol).to_string(), None)
        }
    };

    let observations = quotes.iter().filter_map(|q| {
        let date = chrono::DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
        let price = if q.adjclose.is_finite() && q.adjclose > 0.0 {
            q.adjclose
        } else {
            q.close
        };
        Some((date, price))
    });

    Ok(RawHistory {
        series: PriceSeries::from_observations(symbol, currency, observations),
        exchange,
        highs: quotes.iter().map(|q| q.high).filter(|v| v.is_finite() && *v > 0.0).collect(),
        lows: quotes.iter().map(|q| q.low).filter(|v| v.is_finite() && *v > 0.0).collect(),
    })
}

/// NaiveDate를 OffsetDateTime(UTC 자정)으로 변환.
pub(crate) fn naive_date_to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime> {
    let month = time::Month::try_from(date.month() as u8)
        .map_err(|e| DataError::InvalidData(format!("잘못된 월 ({}): {}", date, e)))?;
    let day = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
        .map_err(|e| DataError::InvalidData(format!("잘못된 날짜 ({}): {}", date, e)))?;
    Ok(day.midnight().assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_date_conversion() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let odt = naive_date_to_offset_datetime(date).unwrap();
        assert_eq!(odt.year(), 2024);
        assert_eq!(odt.month(), time::Month::February);
        assert_eq!(odt.day(), 29);
        assert_eq!(odt.hour(), 0);
    }

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_fetch_history_live() {
        let provider = YahooMarketDataProvider::new(30).unwrap();
        let series = provider.fetch_history("AAPL", Period::OneYear).await.unwrap();
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.currency(), "USD");
        assert!(series.len() > 200);
    }

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_tsx_suffix_retry_live() {
        let provider = YahooMarketDataProvider::new(30).unwrap();
        // ATD는 TSX에만 상장
        let series = provider.fetch_history("ATD", Period::OneYear).await.unwrap();
        assert_eq!(series.symbol(), "ATD.TO");
        assert_eq!(series.currency(), "CAD");
    }
}
