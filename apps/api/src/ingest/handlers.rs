//! Axum route handlers for the ingestion API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::adapters::{adapter_for_source, all_adapters};
use crate::ingest::runner::{ingest_source, run_ingestion, IngestError, IngestionReport};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SourceInfo {
    pub slug: &'static str,
    pub feed_url: &'static str,
}

/// GET /api/v1/sources
pub async fn handle_list_sources() -> Json<Vec<SourceInfo>> {
    Json(
        all_adapters()
            .iter()
            .map(|a| SourceInfo {
                slug: a.slug(),
                feed_url: a.feed_url(),
            })
            .collect(),
    )
}

/// POST /api/v1/ingest
///
/// Ingests every known source. Per-source failures are reported in the body.
pub async fn handle_ingest_all(State(state): State<AppState>) -> Json<IngestionReport> {
    Json(run_ingestion(state, all_adapters()).await)
}

/// POST /api/v1/ingest/:source
pub async fn handle_ingest_source(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<IngestionReport>, AppError> {
    let adapter = adapter_for_source(&source)
        .ok_or_else(|| AppError::NotFound(format!("Unknown source '{source}'")))?;

    let run_id = Uuid::new_v4();
    let summary = ingest_source(&state, adapter.as_ref(), run_id)
        .await
        .map_err(|e| match e {
            IngestError::Feed(feed) => AppError::Upstream(feed.to_string()),
            IngestError::Store(inner) => AppError::Internal(inner),
        })?;

    Ok(Json(IngestionReport {
        run_id,
        sources: vec![summary],
    }))
}
