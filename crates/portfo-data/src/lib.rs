//! 시장 데이터 및 환율 제공자.
//!
//! 이 crate는 `portfo-core`의 협력자 트레이트 구현을 제공합니다:
//! - [`YahooMarketDataProvider`]: Yahoo Finance 일별 시세 및 종목 정보
//! - [`InMemoryMarketDataProvider`]: 오프라인/테스트용 고정 데이터
//! - 환율 체인: exchangerate.host → Yahoo `USDCAD=X` → 고정 환율
//! - 티커 정규화 (지수 별칭, TSX `.TO` 접미사)

pub mod error;
pub mod fx;
pub mod provider;

pub use error::{DataError, Result};
pub use fx::{
    default_fx_chain, ChainedFxProvider, ExchangeRateHostProvider, StaticFxRateProvider,
    YahooFxProvider,
};
pub use provider::{
    normalize_ticker, resolve_index, ticker_candidates, InMemoryMarketDataProvider,
    YahooMarketDataProvider, INDEX_ALIASES,
};
