//! HTTP router construction.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use finlens_core::config::ServerConfig;

use crate::api;
use crate::state::AppState;

/// Build the application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route(
            "/analyze",
            post(api::analyze).layer(DefaultBodyLimit::max(server.max_upload_bytes())),
        )
        .route("/analyses", get(api::list_analyses))
        .route("/analyses/{id}", get(api::get_analysis))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(e) => {
            warn!(origin, error = %e, "invalid CORS_ORIGIN, allowing any origin");
            CorsLayer::permissive()
        }
    }
}
