//! 환율 제공자.
//!
//! 기본 체인은 exchangerate.host → Yahoo `USDCAD=X` → 고정 환율 순서이며,
//! 각 소스는 한 번씩만 시도합니다.

mod chain;
mod exchangerate_host;
mod fixed;
mod yahoo;

pub use chain::ChainedFxProvider;
pub use exchangerate_host::ExchangeRateHostProvider;
pub use fixed::StaticFxRateProvider;
pub use yahoo::YahooFxProvider;

use std::sync::Arc;

use portfo_core::FxConfig;

use crate::error::Result;

/// 설정에서 기본 환율 체인을 구성합니다.
pub fn default_fx_chain(config: &FxConfig) -> Result<ChainedFxProvider> {
    let http = ExchangeRateHostProvider::new(&config.base_url, config.timeout_secs)?;
    let yahoo = YahooFxProvider::new()?;
    Ok(ChainedFxProvider::new(vec![
        Arc::new(http),
        Arc::new(yahoo),
        Arc::new(StaticFxRateProvider::new()),
    ]))
}
