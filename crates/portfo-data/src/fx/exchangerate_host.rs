//! exchangerate.host HTTP 환율 제공자.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use portfo_core::{FxRateProvider, ProviderError};
use serde::Deserialize;
use tracing::debug;

use crate::error::{DataError, Result};

/// `/latest` 또는 `/{date}` 응답.
///
/// `success` 필드가 없는 호환 서버도 있어서 `rates`만 있으면 사용합니다.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
}

/// exchangerate.host 호환 API 클라이언트.
pub struct ExchangeRateHostProvider {
    client: reqwest::Client,
    base_url: String,
}

impl ExchangeRateHostProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DataError::ConnectionError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(d) => format!("{}/{}", self.base_url, d.format("%Y-%m-%d")),
            None => format!("{}/latest", self.base_url),
        }
    }

    async fn fetch_rate(&self, from: &str, to: &str, date: Option<NaiveDate>) -> Result<f64> {
        let url = self.endpoint(date);
        debug!(%url, from, to, "exchangerate.host 조회");

        let response = self
            .client
            .get(&url)
            .query(&[("base", from), ("symbols", to)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: RatesResponse = response.json().await?;
        debug!(success = ?body.success, "exchangerate.host 응답");

        body.rates
            .and_then(|rates| rates.get(to).copied())
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or_else(|| DataError::ParseError(format!("응답에 {} 환율이 없습니다", to)))
    }
}

#[async_trait]
impl FxRateProvider for ExchangeRateHostProvider {
    fn name(&self) -> &str {
        "exchangerate.host"
    }

    async fn rate(
        &self,
        from: &str,
        to: &str,
        date: Option<NaiveDate>,
    ) -> std::result::Result<f64, ProviderError> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(1.0);
        }
        Ok(self.fetch_rate(from, to, date).await?)
    }
}
