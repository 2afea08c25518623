//! 포트폴리오 분석 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 포트폴리오 성과 분석 (`portfo analyze`)
//! - 단일 종목 가격 이력 (`portfo history`)
//! - 환율 조회 (`portfo fx`)

pub mod commands;

pub use commands::*;
