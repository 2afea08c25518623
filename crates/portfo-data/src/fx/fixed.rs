//! 고정 환율 제공자.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use portfo_core::{fallback_rate, FxRateProvider, ProviderError};

/// 고정 환율 테이블.
///
/// 등록되지 않은 쌍은 [`fallback_rate`] 값(USD→CAD 1.35, CAD→USD 0.74, 그 외 1.0)을
/// 사용하므로 항상 성공합니다. 날짜는 무시합니다.
#[derive(Debug, Clone, Default)]
pub struct StaticFxRateProvider {
    overrides: HashMap<(String, String), f64>,
}

impl StaticFxRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 특정 통화 쌍의 환율을 지정합니다.
    pub fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.overrides
            .insert((from.to_uppercase(), to.to_uppercase()), rate);
        self
    }
}

#[async_trait]
impl FxRateProvider for StaticFxRateProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn rate(&self, from: &str, to: &str, _date: Option<NaiveDate>) -> Result<f64, ProviderError> {
        let key = (from.to_uppercase(), to.to_uppercase());
        if key.0 == key.1 {
            return Ok(1.0);
        }
        Ok(self
            .overrides
            .get(&key)
            .copied()
            .unwrap_or_else(|| fallback_rate(from, to)))
    }
}
