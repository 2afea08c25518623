//! 성과 분석 모듈
//!
//! 수익률 시계열의 성과 지표를 계산합니다.
//!
//! # 모듈 구성
//!
//! - [`metrics`]: 성과 지표 계산 (총/연환산 수익률, 변동성, 최대낙폭, 샤프비율)

pub mod metrics;

pub use metrics::*;
