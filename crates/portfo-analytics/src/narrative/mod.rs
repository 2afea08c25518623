//! 해설(내러티브) 생성기.
//!
//! 이미 계산된 [`AssetInsight`]를 읽어 사람이 읽을 문장을 만듭니다.
//! 어떤 수치도 해설 결과에 의존하지 않습니다.
//!
//! - [`RuleBasedNarrator`]: 자격 증명이 없을 때 쓰는 기본 구현
//! - [`OpenAiNarrator`]: Chat Completions API 호출, 실패하면 규칙 기반 문장으로 대체
//!
//! 생성기는 프로세스 시작 시 한 번 만들어 [`crate::PortfolioAnalyzer`]에 주입합니다.

mod openai;
mod rule_based;

pub use openai::OpenAiNarrator;
pub use rule_based::RuleBasedNarrator;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use portfo_core::NarrativeConfig;

use crate::insight::{AssetInsight, Recommendation};

/// 해설 생성기.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// 생성기 이름 (로그용).
    fn name(&self) -> &str;

    /// 종목 하나에 대한 해설.
    async fn summarize(&self, insight: &AssetInsight) -> String;

    /// 여러 종목 추천을 묶은 전체 전망.
    ///
    /// 지원하지 않는 생성기는 `None`을 반환합니다.
    async fn portfolio_outlook(&self, _recommendations: &[Recommendation]) -> Option<String> {
        None
    }
}

/// 설정에 맞는 생성기를 만듭니다.
///
/// API 키가 있으면 [`OpenAiNarrator`], 없거나 클라이언트 생성에 실패하면
/// [`RuleBasedNarrator`]입니다.
pub fn narrator_from_config(config: &NarrativeConfig) -> Arc<dyn NarrativeGenerator> {
    if !config.has_credential() {
        info!("해설 API 키 없음, 규칙 기반 해설 사용");
        return Arc::new(RuleBasedNarrator::new());
    }

    match OpenAiNarrator::from_config(config) {
        Ok(narrator) => {
            info!(model = %config.model, "LLM 해설 생성기 사용");
            Arc::new(narrator)
        }
        Err(e) => {
            warn!(error = %e, "LLM 해설 생성기 초기화 실패, 규칙 기반 해설 사용");
            Arc::new(RuleBasedNarrator::new())
        }
    }
}
