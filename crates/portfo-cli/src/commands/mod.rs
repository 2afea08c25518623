//! CLI 명령어 구현 모듈.

pub mod analyze;
pub mod context;
pub mod fx;
pub mod history;

// 각 서브모듈 직접 사용 권장 (ambiguous re-export 방지)
