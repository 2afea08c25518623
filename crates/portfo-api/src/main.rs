//! 포트폴리오 분석 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//!
//! # 설정
//!
//! `config/default.toml`(또는 `PORTFO_CONFIG` 경로)과 `PORTFO__` 접두사의 환경 변수에서
//! 설정을 읽습니다. 예: `PORTFO__SERVER__PORT=8080`, `PORTFO__NARRATIVE__API_KEY=sk-...`

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use portfo_api::routes::create_api_router;
use portfo_api::state::AppState;
use portfo_core::{init_logging, AppConfig, LogConfig, ServerConfig};

/// 설정 파일 경로 환경 변수.
const CONFIG_PATH_ENV: &str = "PORTFO_CONFIG";

/// CORS 레이어 생성.
///
/// 허용 origin이 설정되지 않으면 모든 origin을 허용합니다 (개발 모드).
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        // preflight 요청 캐시 시간
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        if !config.cors_origins.is_empty() {
            warn!("cors_origins is set but contains no valid origins, allowing any");
        } else {
            warn!("cors_origins not set, allowing any origin (development mode)");
        }
        layer.allow_origin(AllowOrigin::any())
    } else {
        info!("CORS configured with {} allowed origins", origins.len());
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(cors_layer(config))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => AppConfig::load(path)?,
        Err(_) => AppConfig::load_default()?,
    };

    init_logging(LogConfig::from_settings(&config.logging))?;

    info!("Starting PortfoVision API server...");

    let state = Arc::new(AppState::from_config(&config).map_err(|e| {
        error!(error = %e, "애플리케이션 상태 초기화 실패");
        e
    })?);

    info!(
        version = %state.version,
        narrator = state.analyzer.narrator_name(),
        max_concurrent_fetches = state.analyzer.settings().max_concurrent_fetches,
        "Application state initialized"
    );

    let app = create_router(state, &config.server);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await.map_err(|e| {
        error!(
            addr = %addr,
            error = %e,
            "소켓 바인딩 실패. PORTFO__SERVER__HOST, PORTFO__SERVER__PORT 설정을 확인하세요."
        );
        e
    })?;

    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
