//! 포트폴리오 분석 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - 통합 에러 응답 (상태 코드 매핑)
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`error`]: API 에러 응답

pub mod error;
pub mod routes;
pub mod state;

pub use error::{error_response, ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::AppState;
