//! Upload-and-analyze plus read access to stored analyses.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use finlens_core::{resolve_query, AnalysisRecord, AnalysisSummary};

use crate::error::{AnalyzeError, ApiError};
use crate::state::AppState;
use crate::upload::TempUpload;

const DEFAULT_LIST_LIMIT: u32 = 20;

struct UploadForm {
    filename: String,
    bytes: Vec<u8>,
    query: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut query = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::multipart("Multipart error", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("unnamed").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::multipart("Failed to read file", e))?;
                file = Some((filename, bytes.to_vec()));
            }
            "query" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::multipart("Failed to read query", e))?;
                query = Some(text);
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;
    Ok(UploadForm { filename, bytes, query })
}

/// Persist the upload under its own path, extract, analyze. The upload is removed on return.
async fn run_analysis(
    state: &AppState,
    id: Uuid,
    bytes: &[u8],
    query: &str,
) -> Result<String, AnalyzeError> {
    let upload = TempUpload::write(state.storage.upload_path(&id.to_string()), bytes).await?;
    state.refresh_sample(bytes).await?;

    let path = upload.path().to_path_buf();
    let text = tokio::task::spawn_blocking(move || finlens_ingest::extract(&path)).await??;
    info!(%id, chars = text.len(), "document text extracted");

    Ok(state.pipeline.analyze(&text, query).await?)
}

/// POST /analyze
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalysisRecord>, ApiError> {
    let form = read_form(multipart).await?;
    let id = Uuid::new_v4();
    let query = resolve_query(form.query.as_deref());
    let start = Instant::now();

    info!(%id, filename = %form.filename, bytes = form.bytes.len(), "analysis requested");

    let analysis = run_analysis(&state, id, &form.bytes, &query).await?;
    let record = AnalysisRecord::new(id, form.filename, query, analysis);
    state.store.insert(&record).await.map_err(AnalyzeError::from)?;

    info!(%id, elapsed_ms = start.elapsed().as_millis() as u64, "analysis stored");
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub results: Vec<AnalysisSummary>,
}

/// GET /analyses?limit=N
pub async fn list_analyses(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let results = state.store.list_recent(limit).await?;
    Ok(Json(ListResponse { results }))
}

/// GET /analyses/{id}
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisRecord>, ApiError> {
    state
        .store
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}
