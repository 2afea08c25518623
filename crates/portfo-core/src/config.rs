//! 설정 관리.
//!
//! 내장 기본값 → TOML 파일(선택) → `PORTFO__` 접두사 환경 변수 순서로
//! 병합하여 [`AppConfig`]를 만듭니다.
//!
//! ```text
//! PORTFO__SERVER__PORT=8000
//! PORTFO__NARRATIVE__API_KEY=sk-...
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "PORTFO";

/// 애플리케이션 설정.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 시장 데이터 조회 설정
    pub market_data: MarketDataConfig,
    /// 환율 조회 설정
    pub fx: FxConfig,
    /// 해설 생성기 설정
    pub narrative: NarrativeConfig,
    /// 요청 한도
    pub limits: LimitsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 허용할 CORS origin 목록 (비어 있으면 모두 허용)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 60,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 시장 데이터 조회 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// 요청당 동시 조회할 최대 자산 수
    pub max_concurrent_fetches: usize,
    /// 기간 조회가 비었을 때 날짜 범위 재조회에 더할 여유 일수
    pub lookback_padding_days: i64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 8,
            lookback_padding_days: 30,
        }
    }
}

/// 환율 조회 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FxConfig {
    /// exchangerate.host 호환 API 기본 URL
    pub base_url: String,
    /// HTTP 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.exchangerate.host".to_string(),
            timeout_secs: 10,
        }
    }
}

/// 해설(내러티브) 생성기 설정.
///
/// `api_key`가 없으면 규칙 기반 생성기만 사용합니다.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// LLM API 키
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    /// Chat Completions 호환 API 기본 URL
    pub base_url: String,
    /// 모델 이름
    pub model: String,
    /// 종목별 해설 최대 토큰
    pub max_tokens: u32,
    /// 샘플링 온도
    pub temperature: f32,
    /// HTTP 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|key| SecretString::new(key.into())))
}

impl NarrativeConfig {
    /// 사용 가능한 API 키가 설정되었는지 확인합니다.
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }
}

/// 요청 크기 한도.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// 포트폴리오 요청당 최대 티커 수
    pub max_portfolio_tickers: usize,
    /// 배치 이력 조회 최대 티커 수
    pub max_batch_tickers: usize,
    /// 추천 요청 최대 티커 수
    pub max_recommend_tickers: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_portfolio_tickers: 50,
            max_batch_tickers: 10,
            max_recommend_tickers: 10,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
