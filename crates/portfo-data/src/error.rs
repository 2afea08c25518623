//! 데이터 모듈 오류 타입.

use portfo_core::ProviderError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 클라이언트 생성/연결 오류
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// 데이터를 찾을 수 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 외부 소스 호출 오류
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 외부 소스가 에러 상태를 반환
    #[error("Upstream returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 타임아웃 오류
    #[error("Operation timeout: {0}")]
    Timeout(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::Timeout(err.to_string())
        } else if err.is_decode() {
            DataError::ParseError(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<DataError> for ProviderError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(msg) => ProviderError::NotFound(msg),
            DataError::ConnectionError(msg) | DataError::FetchError(msg) | DataError::Timeout(msg) => {
                ProviderError::Network(msg)
            }
            DataError::HttpStatus { status, body } => {
                ProviderError::Api(format!("status {}: {}", status, body))
            }
            DataError::ParseError(msg) | DataError::InvalidData(msg) => ProviderError::Parse(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
