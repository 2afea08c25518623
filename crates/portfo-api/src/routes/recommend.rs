//! 종목 추천 endpoint.
//!
//! `POST /ai/recommend` - 1-10개 티커에 대한 해설, 핵심 지표, 신뢰도.
//! 해설 생성기가 LLM이면 전체 전망(`summary`)도 포함됩니다.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use portfo_analytics::RecommendationReport;

use crate::error::{error_response, ApiResult};
use crate::state::AppState;

/// 추천 요청 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub tickers: Vec<String>,
}

/// 종목 추천.
///
/// POST /ai/recommend
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendRequest>,
) -> ApiResult<Json<RecommendationReport>> {
    let report = state
        .analyzer
        .recommend(&request.tickers)
        .await
        .map_err(error_response)?;

    Ok(Json(report))
}

/// 추천 라우터 생성.
pub fn recommend_router() -> Router<Arc<AppState>> {
    Router::new().route("/ai/recommend", post(recommend))
}
