//! # PortfoVision Core
//!
//! 포트폴리오 성과 분석 시스템의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 가격 시계열, 보유 종목, 포트폴리오 요청 타입
//! - 보고 통화 및 분석 기간 정의
//! - 성과 지표 레코드
//! - 외부 협력자 트레이트 (시장 데이터, 환율)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
