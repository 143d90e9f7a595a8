//! Endpoint handlers.
//!
//! Provides handlers for:
//! - Welcome and health (`/`, `/health`)
//! - Per-symbol reports that fetch market data (`/get_signal`,
//!   `/get_indicators`, `/analyze_sentiment`, `/final_verdict`,
//!   `/enhanced_signal`)
//! - Analysis of a client-supplied indicator set (`/analyze_stock`)
//!
//! Pipeline calls block on provider I/O, so they run on tokio's blocking pool.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Json, Query, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use stocksignal_core::analysis::AnalysisResult;
use stocksignal_core::indicators::IndicatorSet;
use stocksignal_core::{Pipeline, PipelineError};

pub const WELCOME: &str = "Welcome to the Stock Trading Signal API!";

/// `?stock_symbol=` query string.
#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    pub stock_symbol: String,
}

/// `{"stock_symbol": ...}` request body.
#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub stock_symbol: String,
}

/// Body of `POST /analyze_stock`.
#[derive(Debug, Deserialize)]
pub struct IndicatorData {
    pub stock_symbol: String,
    #[serde(default)]
    pub indicators: IndicatorSet,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeStockResponse {
    pub stock: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// Run a pipeline operation on the blocking pool.
async fn blocking<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Pipeline) -> Result<T, PipelineError> + Send + 'static,
{
    let pipeline = state.pipeline.clone();
    let outcome = tokio::task::spawn_blocking(move || op(&pipeline))
        .await
        .map_err(|e| ApiError::Internal(format!("pipeline task failed: {e}")))?;
    Ok(outcome?)
}

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": WELCOME }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "analyzer": state.pipeline.analyzer_name(),
    }))
}

/// GET /get_signal?stock_symbol=AAPL
#[tracing::instrument(skip(state))]
pub async fn get_signal(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = blocking(&state, move |p| p.signal(&query.stock_symbol)).await?;
    Ok(Json(report))
}

/// POST /get_indicators {"stock_symbol": "AAPL"}
#[tracing::instrument(skip(state))]
pub async fn get_indicators(
    State(state): State<AppState>,
    Json(request): Json<StockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let report = blocking(&state, move |p| p.indicators(&request.stock_symbol)).await?;
    Ok(Json(report))
}

/// POST /analyze_stock {"stock_symbol": "AAPL", "indicators": {...}}
///
/// Pure computation over the posted set; no market data is fetched.
#[tracing::instrument(skip_all)]
pub async fn analyze_stock(
    State(state): State<AppState>,
    Json(request): Json<IndicatorData>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.pipeline.analyze(request.indicators)?;
    Ok(Json(AnalyzeStockResponse {
        stock: request.stock_symbol,
        result,
    }))
}

/// GET /analyze_sentiment?stock_symbol=AAPL
#[tracing::instrument(skip(state))]
pub async fn analyze_sentiment(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = blocking(&state, move |p| p.sentiment(&query.stock_symbol)).await?;
    Ok(Json(report))
}

/// POST /final_verdict?stock_symbol=AAPL
#[tracing::instrument(skip(state))]
pub async fn final_verdict(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let verdict = blocking(&state, move |p| p.final_verdict(&query.stock_symbol)).await?;
    Ok(Json(verdict))
}

/// GET /enhanced_signal?stock_symbol=AAPL
#[tracing::instrument(skip(state))]
pub async fn enhanced_signal(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = blocking(&state, move |p| p.enhanced(&query.stock_symbol)).await?;
    Ok(Json(report))
}
