//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stocksignal_core::analysis::AnalysisError;
use stocksignal_core::data::DataError;
use stocksignal_core::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error payload.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<&'static str>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(PipelineError::InvalidSymbol(_)) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(PipelineError::Data(e)) => data_status(e),
            ApiError::Pipeline(PipelineError::Analysis(_)) | ApiError::Analysis(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Pipeline(PipelineError::News(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Pipeline(PipelineError::Config(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        match self {
            ApiError::Pipeline(PipelineError::Analysis(AnalysisError::InsufficientData {
                missing,
            }))
            | ApiError::Analysis(AnalysisError::InsufficientData { missing }) => missing.clone(),
            _ => Vec::new(),
        }
    }
}

fn data_status(error: &DataError) -> StatusCode {
    match error {
        DataError::NoData { .. } | DataError::SymbolNotFound { .. } => StatusCode::NOT_FOUND,
        DataError::UnsupportedPeriod(_) | DataError::UnsupportedInterval(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
            missing: self.missing(),
        };
        (status, Json(body)).into_response()
    }
}
