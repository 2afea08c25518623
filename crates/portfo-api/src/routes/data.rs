//! 가격 이력 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /api/data?ticker=&period=&currency=` - 단일 자산 일별 이력과 요약
//! - `GET /api/data/batch?tickers=A,B&period=` - 여러 자산 일별 이력 (원래 통화)

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use portfo_analytics::{AssetHistory, BatchHistory};

use super::{parse_currency, parse_period};
use crate::error::{bad_request, error_response, ApiResult};
use crate::state::AppState;

/// 단일 자산 이력 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub ticker: Option<String>,
    pub period: Option<String>,
    /// 보고 통화 (없으면 자산의 원래 통화)
    pub currency: Option<String>,
}

/// 배치 이력 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct BatchQuery {
    /// 쉼표로 구분된 티커 목록
    pub tickers: Option<String>,
    pub period: Option<String>,
}

/// 단일 자산 이력.
///
/// GET /api/data
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<AssetHistory>> {
    let ticker = query
        .ticker
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| bad_request("ticker query parameter is required"))?;
    let period = parse_period(query.period.as_deref())?;
    let currency = parse_currency(query.currency.as_deref())?;

    let history = state
        .analyzer
        .asset_history(ticker, period, currency)
        .await
        .map_err(error_response)?;

    Ok(Json(history))
}

/// 여러 자산 이력.
///
/// GET /api/data/batch
pub async fn get_history_batch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BatchQuery>,
) -> ApiResult<Json<BatchHistory>> {
    let period = parse_period(query.period.as_deref())?;
    let tickers: Vec<String> = query
        .tickers
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let batch = state
        .analyzer
        .batch_history(&tickers, period)
        .await
        .map_err(error_response)?;

    Ok(Json(batch))
}

/// 가격 이력 라우터 생성.
pub fn data_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/data", get(get_history))
        .route("/api/data/batch", get(get_history_batch))
}
