//! Yahoo Finance `USDCAD=X` 환율 제공자.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use portfo_core::{FxRateProvider, ProviderError};
use tracing::debug;
use yahoo_finance_api as yahoo;

use crate::error::{DataError, Result};
use crate::provider::yahoo::naive_date_to_offset_datetime;

/// USD→CAD 환율 심볼.
const USDCAD_SYMBOL: &str = "USDCAD=X";

/// USD↔CAD 전용 Yahoo 환율 제공자.
///
/// CAD→USD는 `USDCAD=X` 종가의 역수입니다.
pub struct YahooFxProvider {
    connector: yahoo::YahooConnector,
}

impl YahooFxProvider {
    pub fn new() -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))?;
        Ok(Self { connector })
    }

    /// `date` 이전 마지막 종가, 날짜가 없으면 최신 종가.
    async fn usdcad_close(&self, date: Option<NaiveDate>) -> Result<f64> {
        let response = match date {
            Some(d) => {
                let start = naive_date_to_offset_datetime(d - Duration::days(7))?;
                let end = naive_date_to_offset_datetime(d + Duration::days(1))?;
                self.connector
                    .get_quote_history_interval(USDCAD_SYMBOL, start, end, "1d")
                    .await
            }
            None => self.connector.get_quote_range(USDCAD_SYMBOL, "1d", "5d").await,
        }
        .map_err(|e| DataError::FetchError(format!("Yahoo 환율 조회 실패: {}", e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::ParseError(format!("Quote 파싱 오류: {}", e)))?;

        let close = quotes
            .iter()
            .rev()
            .map(|q| q.close)
            .find(|c| c.is_finite() && *c > 0.0)
            .ok_or_else(|| DataError::NotFound(USDCAD_SYMBOL.to_string()))?;

        debug!(close, ?date, "USDCAD=X 종가");
        Ok(close)
    }
}

#[async_trait]
impl FxRateProvider for YahooFxProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn rate(
        &self,
        from: &str,
        to: &str,
        date: Option<NaiveDate>,
    ) -> std::result::Result<f64, ProviderError> {
        let pair = (from.to_uppercase(), to.to_uppercase());
        match (pair.0.as_str(), pair.1.as_str()) {
            (a, b) if a == b => Ok(1.0),
            ("USD", "CAD") => Ok(self.usdcad_close(date).await?),
            ("CAD", "USD") => Ok(1.0 / self.usdcad_close(date).await?),
            _ => Err(ProviderError::Unsupported(format!("{}→{}", from, to))),
        }
    }
}
