//! StockSignal HTTP API.
//!
//! A thin axum layer over [`Pipeline`]: each endpoint parses its input, runs
//! one pipeline operation and serializes the result. Errors map to status
//! codes in [`error::ApiError`].

pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use stocksignal_core::config::ServerConfig;
use stocksignal_core::Pipeline;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

/// Build the router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/get_signal", get(handlers::get_signal))
        .route("/get_indicators", post(handlers::get_indicators))
        .route("/analyze_stock", post(handlers::analyze_stock))
        .route("/analyze_sentiment", get(handlers::analyze_sentiment))
        .route("/final_verdict", post(handlers::final_verdict))
        .route("/enhanced_signal", get(handlers::enhanced_signal))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, pipeline: Arc<Pipeline>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(addr = %listener.local_addr()?, analyzer = pipeline.analyzer_name(), "listening");
    tracing::info!("  GET  /get_signal?stock_symbol=");
    tracing::info!("  POST /get_indicators");
    tracing::info!("  POST /analyze_stock");
    tracing::info!("  GET  /analyze_sentiment?stock_symbol=");
    tracing::info!("  POST /final_verdict?stock_symbol=");
    tracing::info!("  GET  /enhanced_signal?stock_symbol=");

    axum::serve(listener, router(AppState::new(pipeline)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => tracing::error!(error = %e, "failed to listen for Ctrl-C"),
    }
}
