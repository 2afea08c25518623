//! 환율 제공자 trait 및 고정 대체 환율.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ProviderError;

/// 조회 실패 시 사용하는 USD→CAD 근사 환율.
pub const FALLBACK_USD_CAD: f64 = 1.35;
/// 조회 실패 시 사용하는 CAD→USD 근사 환율.
pub const FALLBACK_CAD_USD: f64 = 0.74;

/// 고정 대체 환율.
///
/// USD↔CAD 외의 쌍과 같은 통화끼리는 1.0입니다.
pub fn fallback_rate(from: &str, to: &str) -> f64 {
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();
    match (from.as_str(), to.as_str()) {
        ("USD", "CAD") => FALLBACK_USD_CAD,
        ("CAD", "USD") => FALLBACK_CAD_USD,
        _ => 1.0,
    }
}

/// 환율 제공자.
///
/// `from` 통화 1단위를 `to` 통화로 바꾸는 배수를 반환합니다.
/// `date`가 없으면 현재 환율입니다.
#[async_trait]
pub trait FxRateProvider: Send + Sync {
    /// 제공자 이름 (로그용).
    fn name(&self) -> &str;

    async fn rate(
        &self,
        from: &str,
        to: &str,
        date: Option<NaiveDate>,
    ) -> Result<f64, ProviderError>;
}
