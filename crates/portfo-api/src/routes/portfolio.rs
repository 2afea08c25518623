//! 포트폴리오 성과 endpoint.
//!
//! # 엔드포인트
//!
//! - `POST /api/portfolio` - 티커/가중치(합계 1.0) 요청으로 성과 계산
//! - `POST /api/portfolio/calculate?years=` - 임의 배율 가중치의 보유 종목으로 성과 계산

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use portfo_analytics::PortfolioAnalysis;
use portfo_core::{round_to, Currency, Holding, PerformanceMetrics, PortfolioRequest, PricePoint};

use super::period_from_years;
use crate::error::{error_response, ApiResult};
use crate::state::AppState;

// ==================== 응답 타입 ====================

/// 성과 요약 (%, 소수 둘째 자리).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// 누적 수익률 (%)
    #[serde(rename = "return")]
    pub total_return: f64,
    /// 연환산 변동성 (%)
    pub volatility: f64,
    /// 최대 낙폭 (%)
    pub drawdown: f64,
    /// 샤프 비율 (무위험 수익률 0)
    pub sharpe_ratio: f64,
}

/// 자산별 성과 (%, 소수 둘째 자리).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub ticker: String,
    pub total_return: f64,
    pub annualized_return: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
    /// 정규화 가중치 (%)
    pub weight: f64,
}

/// `POST /api/portfolio` 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioResponse {
    pub performance: PerformanceSummary,
    /// 포트폴리오 가치 곡선 (첫 값 1.0, 반올림하지 않음)
    pub timeseries: Vec<PricePoint>,
    pub currency: Currency,
    pub breakdown: Vec<BreakdownEntry>,
    /// 실제로 사용된 가중치
    pub weights: BTreeMap<String, f64>,
    /// 제외된 티커 ("티커: 사유")
    pub failed_tickers: Vec<String>,
}

impl From<PortfolioAnalysis> for PortfolioResponse {
    fn from(analysis: PortfolioAnalysis) -> Self {
        let percent = analysis.metrics.as_percent();
        Self {
            performance: PerformanceSummary {
                total_return: round_to(percent.total_return, 2),
                volatility: round_to(percent.annualized_volatility, 2),
                drawdown: round_to(percent.max_drawdown, 2),
                sharpe_ratio: round_to(percent.sharpe_ratio, 2),
            },
            breakdown: analysis
                .breakdown
                .iter()
                .map(|b| {
                    let m = b.metrics.as_percent();
                    BreakdownEntry {
                        ticker: b.asset.clone(),
                        total_return: round_to(m.total_return, 2),
                        annualized_return: round_to(m.annualized_return, 2),
                        volatility: round_to(m.annualized_volatility, 2),
                        max_drawdown: round_to(m.max_drawdown, 2),
                        weight: round_to(b.weight * 100.0, 2),
                    }
                })
                .collect(),
            weights: analysis.weights.as_map().clone(),
            failed_tickers: analysis.failures.iter().map(ToString::to_string).collect(),
            currency: analysis.currency,
            timeseries: analysis.timeseries,
        }
    }
}

/// `POST /api/portfolio/calculate` 요청 본문.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRequest {
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub currency: Currency,
}

/// `years` 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct YearsQuery {
    pub years: Option<u32>,
}

/// 차트 포인트 (`value`와 `portfolio`는 같은 값).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: chrono::NaiveDate,
    pub value: f64,
    pub portfolio: f64,
}

/// 자산별 성과 (비율 단위, 가중치는 %).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualReturn {
    pub total_return: f64,
    pub annualized_return: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
    /// 정규화 가중치 (%)
    pub weight: f64,
}

/// `POST /api/portfolio/calculate` 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    /// 포트폴리오 지표 (비율 단위)
    pub metrics: PerformanceMetrics,
    pub chart_data: Vec<ChartPoint>,
    pub individual_returns: BTreeMap<String, IndividualReturn>,
    pub currency: Currency,
    /// 제외된 티커 ("티커: 사유")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_tickers: Vec<String>,
}

impl From<PortfolioAnalysis> for CalculateResponse {
    fn from(analysis: PortfolioAnalysis) -> Self {
        Self {
            metrics: analysis.metrics,
            chart_data: analysis
                .timeseries
                .iter()
                .map(|p| ChartPoint {
                    date: p.date,
                    value: p.value,
                    portfolio: p.value,
                })
                .collect(),
            individual_returns: analysis
                .breakdown
                .iter()
                .map(|b| {
                    (
                        b.asset.clone(),
                        IndividualReturn {
                            total_return: b.metrics.total_return,
                            annualized_return: b.metrics.annualized_return,
                            volatility: b.metrics.annualized_volatility,
                            max_drawdown: b.metrics.max_drawdown,
                            weight: b.weight * 100.0,
                        },
                    )
                })
                .collect(),
            currency: analysis.currency,
            failed_tickers: analysis.failures.iter().map(ToString::to_string).collect(),
        }
    }
}

// ==================== Handler ====================

/// 포트폴리오 성과 계산.
///
/// POST /api/portfolio
pub async fn calculate_portfolio_performance(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PortfolioRequest>,
) -> ApiResult<Json<PortfolioResponse>> {
    let analysis = state
        .analyzer
        .analyze(&request)
        .await
        .map_err(error_response)?;

    info!(
        assets = analysis.assets.len(),
        failed = analysis.failures.len(),
        "포트폴리오 성과 응답"
    );
    Ok(Json(analysis.into()))
}

/// 보유 종목 기반 성과 계산.
///
/// POST /api/portfolio/calculate?years=1|5|10
pub async fn calculate_holdings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearsQuery>,
    Json(request): Json<CalculateRequest>,
) -> ApiResult<Json<CalculateResponse>> {
    let period = period_from_years(query.years)?;
    let analysis = state
        .analyzer
        .analyze_holdings(&request.holdings, period, request.currency)
        .await
        .map_err(error_response)?;

    Ok(Json(analysis.into()))
}

/// 포트폴리오 라우터 생성.
pub fn portfolio_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/portfolio", post(calculate_portfolio_performance))
        .route("/api/portfolio/calculate", post(calculate_holdings))
}
