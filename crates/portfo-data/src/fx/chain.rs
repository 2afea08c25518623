//! 순서대로 시도하는 환율 제공자 체인.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use portfo_core::{FxRateProvider, ProviderError};
use tracing::{debug, warn};

/// 환율 제공자 체인.
///
/// 각 제공자를 한 번씩 순서대로 시도하고 처음 성공한 값을 반환합니다.
/// 모두 실패하면 마지막 에러를 반환합니다.
pub struct ChainedFxProvider {
    providers: Vec<Arc<dyn FxRateProvider>>,
}

impl ChainedFxProvider {
    pub fn new(providers: Vec<Arc<dyn FxRateProvider>>) -> Self {
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl FxRateProvider for ChainedFxProvider {
    fn name(&self) -> &str {
        "chain"
    }

    async fn rate(&self, from: &str, to: &str, date: Option<NaiveDate>) -> Result<f64, ProviderError> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(1.0);
        }

        let mut last_error = ProviderError::Unsupported(format!("no FX provider for {}→{}", from, to));
        for provider in &self.providers {
            match provider.rate(from, to, date).await {
                Ok(rate) if rate.is_finite() && rate > 0.0 => {
                    debug!(provider = provider.name(), from, to, rate, "환율 조회 성공");
                    return Ok(rate);
                }
                Ok(rate) => {
                    warn!(provider = provider.name(), rate, "비정상 환율, 다음 제공자 시도");
                    last_error = ProviderError::Parse(format!("invalid rate {}", rate));
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "환율 조회 실패, 다음 제공자 시도");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
