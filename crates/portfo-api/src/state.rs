//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 요청 간에 공유됩니다. 분석기 자체는 요청 사이에
//! 가변 상태를 갖지 않으므로 잠금이 필요 없습니다.

use std::sync::Arc;

use portfo_analytics::{narrator_from_config, AnalyzerSettings, PortfolioAnalyzer};
use portfo_core::{AppConfig, PortfoError, PortfoResult};
use portfo_data::{default_fx_chain, YahooMarketDataProvider};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 포트폴리오 분석기 (시장 데이터, 환율, 해설 생성기 포함)
    pub analyzer: Arc<PortfolioAnalyzer>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 주어진 분석기로 상태를 생성합니다.
    pub fn new(analyzer: PortfolioAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 설정에서 실제 제공자(Yahoo Finance, 환율 체인)를 연결한 상태를 생성합니다.
    ///
    /// # Errors
    /// 제공자 생성에 실패하면 [`PortfoError::Config`]를 반환합니다.
    pub fn from_config(config: &AppConfig) -> PortfoResult<Self> {
        let market_data = YahooMarketDataProvider::new(config.market_data.lookback_padding_days)
            .map_err(|e| PortfoError::Config(e.to_string()))?;
        let fx = default_fx_chain(&config.fx).map_err(|e| PortfoError::Config(e.to_string()))?;

        let analyzer = PortfolioAnalyzer::new(Arc::new(market_data), Arc::new(fx))
            .with_narrator(narrator_from_config(&config.narrative))
            .with_settings(AnalyzerSettings::from_config(config));

        Ok(Self::new(analyzer))
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 AppState 생성.
///
/// 네트워크 없이 동작하는 메모리 제공자와 고정 환율을 사용합니다.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use portfo_data::{InMemoryMarketDataProvider, StaticFxRateProvider};

    AppState::new(PortfolioAnalyzer::new(
        Arc::new(InMemoryMarketDataProvider::new()),
        Arc::new(StaticFxRateProvider::new()),
    ))
}
