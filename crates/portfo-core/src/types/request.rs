//! 포트폴리오 분석 요청 타입.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{Currency, Period};
use crate::error::{PortfoError, PortfoResult};

/// 가중치 합계 허용 오차.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// 보유 종목 하나 (자산 식별자, 목표 가중치).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// 요청된 티커
    pub ticker: String,
    /// 목표 가중치 (0 이상, 합계가 1일 필요는 없음)
    pub weight: f64,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            weight,
        }
    }
}

/// 포트폴리오 성과 요청.
///
/// 조회를 시작하기 전에 [`PortfolioRequest::check`]로 검증합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_request_shape"))]
pub struct PortfolioRequest {
    /// 티커 목록 (1-50개)
    #[validate(length(min = 1, max = 50, message = "Between 1 and 50 tickers are required"))]
    pub tickers: Vec<String>,
    /// 티커별 가중치 (합계 ≈ 1.0)
    #[validate(custom(function = "validate_weights"))]
    pub weights: Vec<f64>,
    /// 분석 기간
    #[serde(default)]
    pub period: Period,
    /// 보고 통화
    #[serde(default)]
    pub currency: Currency,
}

fn validate_weights(weights: &[f64]) -> Result<(), ValidationError> {
    if weights.is_empty() {
        return Err(ValidationError::new("weights_empty")
            .with_message("At least one weight is required".into()));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(ValidationError::new("weight_negative")
            .with_message("Weights must be non-negative numbers".into()));
    }
    Ok(())
}

fn validate_request_shape(request: &PortfolioRequest) -> Result<(), ValidationError> {
    if request.tickers.len() != request.weights.len() {
        return Err(ValidationError::new("count_mismatch").with_message(
            format!(
                "Number of tickers ({}) must match number of weights ({})",
                request.tickers.len(),
                request.weights.len()
            )
            .into(),
        ));
    }
    if request.tickers.iter().any(|t| t.trim().is_empty()) {
        return Err(ValidationError::new("ticker_blank")
            .with_message("Ticker symbols must not be blank".into()));
    }
    let sum: f64 = request.weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ValidationError::new("weight_sum")
            .with_message(format!("Weights must sum to 1.0 (got {:.4})", sum).into()));
    }
    Ok(())
}

impl PortfolioRequest {
    pub fn new(tickers: Vec<String>, weights: Vec<f64>, period: Period, currency: Currency) -> Self {
        Self {
            tickers,
            weights,
            period,
            currency,
        }
    }

    /// 요청을 검증합니다.
    ///
    /// `max_tickers`는 설정된 한도이며 파생 검증의 50개 한도보다 작을 수 있습니다.
    pub fn check(&self, max_tickers: usize) -> PortfoResult<()> {
        self.validate()?;
        if self.tickers.len() > max_tickers {
            return Err(PortfoError::InvalidRequest(format!(
                "Maximum {} tickers allowed per portfolio",
                max_tickers
            )));
        }
        Ok(())
    }

    /// (티커, 가중치) 쌍 목록.
    pub fn holdings(&self) -> Vec<Holding> {
        self.tickers
            .iter()
            .zip(&self.weights)
            .map(|(ticker, weight)| Holding::new(ticker.clone(), *weight))
            .collect()
    }
}
