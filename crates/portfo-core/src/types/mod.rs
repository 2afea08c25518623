//! 분석 파이프라인 전반에서 사용되는 공통 타입.

mod currency;
mod metrics;
mod period;
mod request;
mod series;
mod weights;

pub use currency::*;
pub use metrics::*;
pub use period::*;
pub use request::*;
pub use series::*;
pub use weights::*;
