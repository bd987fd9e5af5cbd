//! Liveness endpoint at `GET /`.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Financial Document Analyzer API is running",
    })
}
