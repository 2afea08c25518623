//! 외부 협력자 경계의 도메인 모델.
//!
//! 분석 코어는 이 트레이트들만 알고, 실제 구현(Yahoo Finance, exchangerate.host 등)은
//! `portfo-data` 크레이트가 제공합니다.

mod fx_provider;
mod market_data_provider;

pub use fx_provider::*;
pub use market_data_provider::*;
