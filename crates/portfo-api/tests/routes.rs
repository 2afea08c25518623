//! 라우트 통합 테스트 (메모리 제공자 사용).

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use tower::ServiceExt;

use portfo_analytics::PortfolioAnalyzer;
use portfo_api::{create_api_router, AppState};
use portfo_core::{AssetProfile, PriceSeries, ProviderError};
use portfo_data::{InMemoryMarketDataProvider, StaticFxRateProvider};

fn series(symbol: &str, currency: &str, values: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    PriceSeries::from_observations(
        symbol,
        currency,
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (start + Duration::days(i as i64), *v)),
    )
}

fn app() -> Router {
    let mut profile = AssetProfile::minimal("AAA", "USD");
    profile.name = Some("Triple A Corp".to_string());
    profile.exchange = Some("NMS".to_string());

    let market = InMemoryMarketDataProvider::new()
        .with_series(series("AAA", "USD", &[100.0, 110.0, 121.0]))
        .with_series(series("BBB", "USD", &[50.0, 45.0, 45.0]))
        .with_series(series("RY.TO", "CAD", &[120.0, 121.0, 119.0]))
        .with_series(series("^GSPC", "USD", &[4700.0, 4750.0, 4800.0]))
        .with_profile(profile)
        .with_failure("DOWN", ProviderError::Network("connection reset".to_string()));

    let analyzer = PortfolioAnalyzer::new(Arc::new(market), Arc::new(StaticFxRateProvider::new()));
    create_api_router().with_state(Arc::new(AppState::new(analyzer)))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_portfolio_performance() {
    let (status, json) = post(
        "/api/portfolio",
        json!({"tickers": ["AAA", "BBB"], "weights": [0.5, 0.5], "period": "1y", "currency": "USD"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_close(&json["performance"]["return"], 5.5);
    assert_eq!(json["currency"], "USD");
    assert_eq!(json["timeseries"].as_array().unwrap().len(), 3);
    assert_close(&json["timeseries"][0]["value"], 1.0);
    assert_close(&json["weights"]["AAA"], 0.5);
    assert!(json["failed_tickers"].as_array().unwrap().is_empty());
    assert!(json["performance"]["sharpe_ratio"].as_f64().unwrap() > 0.0);

    // breakdown 가중치는 %
    let breakdown = json["breakdown"].as_array().unwrap();
    let aaa = breakdown.iter().find(|b| b["ticker"] == "AAA").unwrap();
    assert_close(&aaa["weight"], 50.0);
    assert_close(&aaa["total_return"], 21.0);
}

#[tokio::test]
async fn test_portfolio_drawdown_from_start() {
    // BBB: 50 → 45 → 45, 시작값 대비 10% 하락 후 회복 없음
    let (status, json) = post(
        "/api/portfolio",
        json!({"tickers": ["BBB"], "weights": [1.0]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_close(&json["performance"]["drawdown"], -10.0);
    assert_close(&json["performance"]["return"], -10.0);
    assert_close(&json["breakdown"][0]["max_drawdown"], -10.0);
}

#[tokio::test]
async fn test_portfolio_partial_failure() {
    let (status, json) = post(
        "/api/portfolio",
        json!({"tickers": ["AAA", "BBB", "NOPE"], "weights": [0.5, 0.3, 0.2]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_close(&json["weights"]["AAA"], 0.625);
    assert_close(&json["weights"]["BBB"], 0.375);
    let failed = json["failed_tickers"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].as_str().unwrap().starts_with("NOPE"));
}

#[tokio::test]
async fn test_portfolio_validation_errors() {
    let (status, json) = post(
        "/api/portfolio",
        json!({"tickers": ["AAA", "BBB"], "weights": [0.5, 0.2]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_REQUEST");
    assert_eq!(json["message"], "Weights must sum to 1.0 (got 0.7000)");

    let (status, json) = post(
        "/api/portfolio",
        json!({"tickers": ["AAA"], "weights": [0.5, 0.5]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Number of tickers (1) must match number of weights (2)"
    );
}

#[tokio::test]
async fn test_portfolio_all_failed() {
    let (status, json) = post(
        "/api/portfolio",
        json!({"tickers": ["NOPE", "NADA"], "weights": [0.5, 0.5]}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "ALL_ASSETS_FAILED");
    assert_eq!(json["details"]["failed_tickers"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_portfolio_skips_network_failure() {
    // 네트워크 실패 종목은 제외하고 계속 진행
    let (status, json) = post(
        "/api/portfolio",
        json!({"tickers": ["DOWN", "AAA"], "weights": [0.5, 0.5]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_close(&json["weights"]["AAA"], 1.0);
}

#[tokio::test]
async fn test_legacy_calculate() {
    let (status, json) = post(
        "/api/portfolio/calculate?years=1",
        json!({"holdings": [{"ticker": "AAA", "weight": 60}, {"ticker": "BBB", "weight": 40}], "currency": "CAD"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["currency"], "CAD");
    assert_close(&json["individual_returns"]["AAA"]["weight"], 60.0);
    assert_close(&json["chart_data"][0]["portfolio"], 1.0);
    assert!(json["metrics"]["volatility"].is_number());

    let (status, _) = post(
        "/api/portfolio/calculate?years=3",
        json!({"holdings": [{"ticker": "AAA", "weight": 1}]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post("/api/portfolio/calculate", json!({"holdings": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Portfolio is empty");
}

#[tokio::test]
async fn test_index_comparison() {
    let (status, json) = get("/api/indices/sp500?years=1&currency=CAD").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "SP500");
    assert_eq!(json["symbol"], "^GSPC");
    assert_eq!(json["currency"], "CAD");
    assert_close(&json["chart_data"][0]["value"], 1.0);

    let (status, json) = get("/api/indices/FTSE").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid index name: FTSE");
}

#[tokio::test]
async fn test_stock_info() {
    let (status, json) = get("/api/stock/aaa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ticker"], "AAA");
    assert_eq!(json["name"], "Triple A Corp");
    assert_eq!(json["exchange"], "NMS");
    assert_eq!(json["currency"], "USD");

    let (status, _) = get("/api/stock/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fx_rate() {
    let (status, json) = get("/api/fx-rate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["from"], "USD");
    assert_eq!(json["to"], "CAD");
    assert_close(&json["rate"], 1.35);

    let (_, json) = get("/api/fx-rate?from_currency=cad&to_currency=usd").await;
    assert_close(&json["rate"], 0.74);
}

#[tokio::test]
async fn test_history() {
    let (status, json) = get("/api/data?ticker=ry&period=1y").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ticker"], "RY.TO");
    assert_eq!(json["period"], "1y");
    assert_eq!(json["metadata"]["currency"], "CAD");
    assert_close(&json["data"][0]["daily_return"], 0.0);

    let (_, json) = get("/api/data?ticker=AAA&currency=CAD").await;
    assert_eq!(json["metadata"]["native_currency"], "USD");
    assert_close(&json["data"][0]["adjusted_close"], 135.0);

    let (status, _) = get("/api/data?period=1y").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get("/api/data?ticker=AAA&period=2y").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_batch() {
    let (status, json) = get("/api/data/batch?tickers=AAA,%20RY,NOPE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success_count"], 2);
    assert_eq!(json["error_count"], 1);
    assert!(json["results"]["RY.TO"].is_object());
    assert!(json["errors"]["NOPE"].is_string());

    let (status, json) = get("/api/data/batch?tickers=,").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "At least one ticker must be provided");

    let tickers: Vec<String> = (0..11).map(|i| format!("T{i}")).collect();
    let (status, json) = get(&format!("/api/data/batch?tickers={}", tickers.join(","))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Maximum 10 tickers allowed per request");
}

#[tokio::test]
async fn test_recommend() {
    let (status, json) = post("/ai/recommend", json!({"tickers": ["AAA", "NOPE"]})).await;
    assert_eq!(status, StatusCode::OK);

    let recs = json["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["ticker"], "AAA");
    assert!(recs[0]["confidence"].is_string());
    assert!(recs[1]["recommendation"]
        .as_str()
        .unwrap()
        .starts_with("Unable to analyze NOPE"));
    assert!(json["summary"].is_null());

    let (status, json) = post("/ai/recommend", json!({"tickers": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "At least one ticker is required");
}
