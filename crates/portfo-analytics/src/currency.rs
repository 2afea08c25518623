//! 통화 변환기.
//!
//! 시계열 하나에 **고정 환율 하나**를 곱해 보고 통화로 바꿉니다.
//! 환율은 시계열의 첫 거래일 기준으로 한 번만 조회하고 모든 날짜에 똑같이 적용합니다.
//!
//! 이후 정규화 단계에서 모든 시계열이 1.0으로 재기준화되므로 일별 환율 잡음 없이
//! 자산 간 비교가 가능합니다. 다만 이는 근사치이며, 환헤지 되지 않은 실제 보유
//! 포지션의 과거 가치를 재현하지는 않습니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use portfo_core::{fallback_rate, FxRateProvider, PriceSeries, SeriesError};

/// 적용된 환율의 출처.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// 같은 통화 (변환 없음)
    Identity,
    /// 환율 제공자
    Provider,
    /// 고정 대체 환율
    Fallback,
}

/// 적용된 환율.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedRate {
    pub rate: f64,
    pub source: RateSource,
}

impl AppliedRate {
    pub fn identity() -> Self {
        Self {
            rate: 1.0,
            source: RateSource::Identity,
        }
    }
}

/// 변환된 시계열.
#[derive(Debug, Clone)]
pub struct ConvertedSeries {
    /// 보고 통화 기준 시계열
    pub series: PriceSeries,
    /// 원래 통화 코드
    pub native_currency: String,
    /// 적용된 환율
    pub applied: AppliedRate,
}

/// 환율 하나를 조회합니다. 실패하면 고정 대체 환율을 사용합니다.
///
/// 같은 통화면 제공자를 호출하지 않고 1.0을 반환합니다.
pub async fn resolve_rate(
    fx: &dyn FxRateProvider,
    from: &str,
    to: &str,
    date: Option<NaiveDate>,
) -> AppliedRate {
    if from.eq_ignore_ascii_case(to) {
        return AppliedRate::identity();
    }

    match fx.rate(from, to, date).await {
        Ok(rate) if rate.is_finite() && rate > 0.0 => {
            debug!(from, to, ?date, rate, provider = fx.name(), "환율 조회 완료");
            AppliedRate {
                rate,
                source: RateSource::Provider,
            }
        }
        Ok(rate) => {
            let fallback = fallback_rate(from, to);
            warn!(from, to, rate, fallback, "비정상 환율, 고정 환율 사용");
            AppliedRate {
                rate: fallback,
                source: RateSource::Fallback,
            }
        }
        Err(e) => {
            let fallback = fallback_rate(from, to);
            warn!(from, to, error = %e, fallback, "환율 조회 실패, 고정 환율 사용");
            AppliedRate {
                rate: fallback,
                source: RateSource::Fallback,
            }
        }
    }
}

/// 시계열을 `target` 통화로 변환합니다.
///
/// 환율 조회 실패는 자산 실패가 아니며 고정 환율로 대체됩니다.
/// 배수를 곱한 값이 유한한 양수가 아닐 때만 에러입니다.
pub async fn convert_series(
    fx: &dyn FxRateProvider,
    series: PriceSeries,
    target: &str,
) -> Result<ConvertedSeries, SeriesError> {
    let native_currency = series.currency().to_string();
    if native_currency.eq_ignore_ascii_case(target) {
        return Ok(ConvertedSeries {
            series,
            native_currency,
            applied: AppliedRate::identity(),
        });
    }

    let applied = resolve_rate(fx, &native_currency, target, series.first_date()).await;
    let converted = series.scaled(applied.rate, target.to_uppercase())?;

    Ok(ConvertedSeries {
        series: converted,
        native_currency,
        applied,
    })
}
