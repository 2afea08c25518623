//! 시장 데이터 Provider 모듈.
//!
//! - `YahooMarketDataProvider`: Yahoo Finance 일봉 시세 + quote summary
//! - `InMemoryMarketDataProvider`: 고정 데이터 (테스트/데모)
//! - `ticker`: 지수 별칭과 TSX 접미사 처리

pub mod memory;
pub mod ticker;
pub mod yahoo;

pub use memory::InMemoryMarketDataProvider;
pub use ticker::{normalize_ticker, resolve_index, ticker_candidates, INDEX_ALIASES, TSX_SUFFIX};
pub use yahoo::YahooMarketDataProvider;
