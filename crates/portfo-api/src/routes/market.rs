//! 시장 정보 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /api/indices/{name}?years=&currency=` - 지수 정규화 곡선과 성과 지표
//! - `GET /api/stock/{ticker}` - 종목 기본 정보
//! - `GET /api/fx-rate?from_currency=&to_currency=` - 현재 환율

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use portfo_analytics::RateSource;
use portfo_core::{Currency, PerformanceMetrics, PricePoint};

use super::{parse_currency, period_from_years};
use crate::error::{error_response, ApiResult};
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 지수 조회 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub years: Option<u32>,
    pub currency: Option<String>,
}

/// 지수 비교 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    /// 지수 지표 (비율 단위)
    pub metrics: PerformanceMetrics,
    /// 정규화 곡선 (첫 값 1.0)
    pub chart_data: Vec<PricePoint>,
    pub name: String,
    pub symbol: String,
    pub currency: Currency,
}

/// 종목 정보 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInfoResponse {
    pub ticker: String,
    pub name: String,
    pub exchange: String,
    pub currency: String,
}

/// 환율 조회 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct FxRateQuery {
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
}

/// 환율 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxRateResponse {
    pub from: String,
    pub to: String,
    pub rate: f64,
    /// 환율 출처 ("identity" | "provider" | "fallback")
    pub source: RateSource,
}

// ==================== Handler ====================

/// 지수 비교.
///
/// GET /api/indices/{name}
pub async fn get_index(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<IndexQuery>,
) -> ApiResult<Json<IndexResponse>> {
    let period = period_from_years(query.years)?;
    let currency = parse_currency(query.currency.as_deref())?;

    let comparison = state
        .analyzer
        .index_comparison(&name, period, currency)
        .await
        .map_err(error_response)?;

    Ok(Json(IndexResponse {
        metrics: comparison.metrics,
        chart_data: comparison.chart_data,
        name: comparison.name,
        symbol: comparison.symbol,
        currency: comparison.currency,
    }))
}

/// 종목 정보.
///
/// GET /api/stock/{ticker}
pub async fn get_stock_info(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<StockInfoResponse>> {
    let profile = state
        .analyzer
        .profile(&ticker)
        .await
        .map_err(error_response)?;

    Ok(Json(StockInfoResponse {
        name: profile.display_name().to_string(),
        exchange: profile
            .exchange
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        currency: profile.currency.clone(),
        ticker: profile.symbol,
    }))
}

/// 현재 환율.
///
/// GET /api/fx-rate (기본값 USD → CAD)
pub async fn get_fx_rate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FxRateQuery>,
) -> ApiResult<Json<FxRateResponse>> {
    let from = query.from_currency.as_deref().unwrap_or("USD");
    let to = query.to_currency.as_deref().unwrap_or("CAD");

    let quote = state
        .analyzer
        .fx_quote(from, to)
        .await
        .map_err(error_response)?;

    Ok(Json(FxRateResponse {
        from: quote.from,
        to: quote.to,
        rate: quote.rate,
        source: quote.source,
    }))
}

/// 시장 정보 라우터 생성.
pub fn market_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/indices/{name}", get(get_index))
        .route("/api/stock/{ticker}", get(get_stock_info))
        .route("/api/fx-rate", get(get_fx_rate))
}
