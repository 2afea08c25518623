//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/` - 서비스 배너
//! - `/health` - 헬스 체크
//! - `/api/portfolio` - 포트폴리오 성과 (티커 + 가중치)
//! - `/api/portfolio/calculate` - 보유 종목 기반 성과 (임의 배율 가중치)
//! - `/api/indices/{name}` - 지수 비교
//! - `/api/stock/{ticker}` - 종목 정보
//! - `/api/fx-rate` - 환율
//! - `/api/data`, `/api/data/batch` - 가격 이력
//! - `/ai/recommend` - 종목 추천

pub mod data;
pub mod health;
pub mod market;
pub mod portfolio;
pub mod recommend;

pub use data::{data_router, BatchQuery, HistoryQuery};
pub use health::{health_router, BannerResponse, HealthResponse};
pub use market::{market_router, FxRateResponse, IndexResponse, StockInfoResponse};
pub use portfolio::{
    portfolio_router, CalculateResponse, PerformanceSummary, PortfolioResponse,
};
pub use recommend::{recommend_router, RecommendRequest};

use axum::Router;
use std::sync::Arc;

use portfo_core::{Currency, Period};

use crate::error::{bad_request, ApiResult};
use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .merge(portfolio_router())
        .merge(market_router())
        .merge(data_router())
        .merge(recommend_router())
}

/// `period` 쿼리 파라미터 (없으면 1년).
pub(crate) fn parse_period(raw: Option<&str>) -> ApiResult<Period> {
    match raw {
        None => Ok(Period::default()),
        Some(value) => value.parse().map_err(bad_request),
    }
}

/// `years` 쿼리 파라미터 (없으면 1년).
pub(crate) fn period_from_years(years: Option<u32>) -> ApiResult<Period> {
    let years = years.unwrap_or(1);
    Period::from_years(years)
        .ok_or_else(|| bad_request(format!("years must be 1, 5, or 10, but got {}", years)))
}

/// `currency` 쿼리 파라미터 (없으면 `None`).
pub(crate) fn parse_currency(raw: Option<&str>) -> ApiResult<Option<Currency>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(bad_request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period(None).unwrap(), Period::OneYear);
        assert_eq!(parse_period(Some("5y")).unwrap(), Period::FiveYears);
        assert!(parse_period(Some("2y")).is_err());
    }

    #[test]
    fn test_period_from_years() {
        assert_eq!(period_from_years(None).unwrap(), Period::OneYear);
        assert_eq!(period_from_years(Some(10)).unwrap(), Period::TenYears);
        let (status, _) = period_from_years(Some(3)).unwrap_err();
        assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency(None).unwrap(), None);
        assert_eq!(parse_currency(Some("")).unwrap(), None);
        assert_eq!(parse_currency(Some("cad")).unwrap(), Some(Currency::Cad));
        assert!(parse_currency(Some("EUR")).is_err());
    }
}
