//! Handler error type.
//!
//! Every handler returns `Result<T, ApiError>`; the error renders as
//! `{"detail": "<message>"}` with the matching status code.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use finlens_agent::BackendError;
use finlens_ingest::ExtractionError;

use crate::db::StoreError;

/// Anything that can go wrong between receiving an upload and storing its analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("{0}")]
    Pipeline(#[from] BackendError),
    #[error("{0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error processing financial document: {0}")]
    Processing(#[from] AnalyzeError),

    #[error("Analysis not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    /// Multipart read failure, carrying axum's status (413 past the body limit).
    #[error("{detail}")]
    Upload { status: StatusCode, detail: String },

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub fn multipart(context: &str, e: MultipartError) -> Self {
        ApiError::Upload {
            status: e.status(),
            detail: format!("{context}: {e}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upload { status, .. } => *status,
            ApiError::Processing(e) => {
                error!(error = %e, "analysis failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Storage(e) => {
                error!(error = %e, "store error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
