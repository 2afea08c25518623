//! 포트폴리오 분석 시스템의 에러 타입.
//!
//! 협력자(시장 데이터, 환율) 경계의 [`ProviderError`]와
//! 요청 단위 실패를 나타내는 [`PortfoError`]를 정의합니다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 외부 데이터 제공자 에러.
///
/// [`crate::MarketDataProvider`]와 [`crate::FxRateProvider`] 구현이 반환합니다.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// 네트워크 에러 (타임아웃, 연결 실패)
    #[error("network error: {0}")]
    Network(String),

    /// 심볼 또는 데이터 없음
    #[error("no data available for {0}")]
    NotFound(String),

    /// 제공자 API가 에러 응답을 반환
    #[error("provider API error: {0}")]
    Api(String),

    /// 응답 파싱 실패
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// 지원하지 않는 요청 (예: 통화 쌍)
    #[error("unsupported request: {0}")]
    Unsupported(String),
}

impl ProviderError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Network(_))
    }

    /// 데이터가 비어 있어서 발생한 에러인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

/// 개별 자산 조회 실패 기록.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFailure {
    /// 요청된 티커 (사용자 입력 그대로)
    pub ticker: String,
    /// 실패 사유
    pub reason: String,
}

impl AssetFailure {
    /// 새 실패 기록을 생성합니다.
    pub fn new(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for AssetFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.ticker, self.reason)
    }
}

/// 요청 단위 분석 에러.
#[derive(Debug, Clone, Error)]
pub enum PortfoError {
    /// 잘못된 요청 (조회 전에 거부)
    #[error("잘못된 요청: {0}")]
    InvalidRequest(String),

    /// 공통 거래일 없음
    #[error("공통 거래일 데이터가 부족합니다")]
    NoOverlappingData,

    /// 모든 자산 조회 실패
    #[error("모든 자산의 데이터를 가져오지 못했습니다: {}", join_failures(.0))]
    AllAssetsFailed(Vec<AssetFailure>),

    /// 외부 제공자 사용 불가
    #[error("제공자 사용 불가: {0}")]
    ProviderUnavailable(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 분석 작업을 위한 Result 타입.
pub type PortfoResult<T> = Result<T, PortfoError>;

fn join_failures(failures: &[AssetFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl PortfoError {
    /// 호출자 입력 때문에 발생한 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PortfoError::InvalidRequest(_)
                | PortfoError::NotFound(_)
                | PortfoError::NoOverlappingData
                | PortfoError::AllAssetsFailed(_)
        )
    }
}

impl From<ProviderError> for PortfoError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(symbol) => PortfoError::NotFound(symbol),
            ProviderError::Unsupported(msg) => PortfoError::InvalidRequest(msg),
            other => PortfoError::ProviderUnavailable(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for PortfoError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();
        messages.sort();
        PortfoError::InvalidRequest(messages.join("; "))
    }
}
