//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! 분석 에러([`PortfoError`])는 [`error_response`]로 HTTP 상태와 본문으로 변환됩니다.
//!
//! | PortfoError | HTTP |
//! |---|---|
//! | InvalidRequest | 400 |
//! | NotFound, AllAssetsFailed, NoOverlappingData | 404 |
//! | ProviderUnavailable | 502 |
//! | Config, Internal | 500 |

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use portfo_core::PortfoError;

/// 에러 응답 본문.
///
/// `details`는 `ALL_ASSETS_FAILED`에서만 채워집니다 (`failed_tickers` 목록).
///
/// ```json
/// {
///   "code": "INVALID_REQUEST",
///   "message": "Invalid index name: FTSE",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_REQUEST", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Unix timestamp (초)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 현재 시각을 타임스탬프로 기록합니다.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// `details` 포함.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 400 응답.
pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::new("INVALID_REQUEST", message)),
    )
}

/// 분석 에러의 HTTP 상태 코드.
pub fn status_for(err: &PortfoError) -> StatusCode {
    match err {
        PortfoError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        PortfoError::NotFound(_)
        | PortfoError::AllAssetsFailed(_)
        | PortfoError::NoOverlappingData => StatusCode::NOT_FOUND,
        PortfoError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
        PortfoError::Config(_) | PortfoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 분석 에러를 API 에러 응답으로 변환합니다.
pub fn error_response(err: PortfoError) -> (StatusCode, Json<ApiErrorResponse>) {
    let status = status_for(&err);
    if status.is_server_error() {
        error!(error = %err, "요청 처리 실패");
    } else {
        warn!(error = %err, status = status.as_u16(), "요청 거부");
    }

    let body = match err {
        PortfoError::InvalidRequest(message) => ApiErrorResponse::new("INVALID_REQUEST", message),
        PortfoError::NotFound(symbol) => {
            ApiErrorResponse::new("NOT_FOUND", format!("No data available for {}", symbol))
        }
        PortfoError::NoOverlappingData => {
            ApiErrorResponse::new("NO_OVERLAPPING_DATA", "No overlapping trading dates found")
        }
        PortfoError::AllAssetsFailed(failures) => {
            let failed: Vec<String> = failures.iter().map(ToString::to_string).collect();
            ApiErrorResponse::with_details(
                "ALL_ASSETS_FAILED",
                format!(
                    "No data available for any ticker. Failed tickers: {}",
                    failed.join(", ")
                ),
                serde_json::json!({ "failed_tickers": failed }),
            )
        }
        PortfoError::ProviderUnavailable(message) => {
            ApiErrorResponse::new("PROVIDER_UNAVAILABLE", message)
        }
        PortfoError::Config(message) | PortfoError::Internal(message) => {
            ApiErrorResponse::new("INTERNAL_ERROR", message)
        }
    };

    (status, Json(body))
}
