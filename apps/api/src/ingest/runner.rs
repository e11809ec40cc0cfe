//! Ingestion runs: fetch → archive → normalize → upsert, one task per source.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::ingest::adapters::{unwrap_rows, SourceAdapter};
use crate::ingest::FeedError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("failed to persist jobs: {0}")]
    Store(anyhow::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceRunSummary {
    pub source_slug: String,
    pub fetched_rows: usize,
    pub normalized: usize,
    pub upserted: u64,
    pub archive_key: Option<String>,
    pub error: Option<String>,
}

impl SourceRunSummary {
    fn failed(source_slug: &str, error: String) -> Self {
        Self {
            source_slug: source_slug.to_string(),
            fetched_rows: 0,
            normalized: 0,
            upserted: 0,
            archive_key: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    pub run_id: Uuid,
    pub sources: Vec<SourceRunSummary>,
}

/// Ingests one source. Archive failures are logged and ignored.
pub async fn ingest_source(
    state: &AppState,
    adapter: &dyn SourceAdapter,
    run_id: Uuid,
) -> Result<SourceRunSummary, IngestError> {
    let slug = adapter.slug();
    let raw = state.fetcher.fetch(adapter.feed_url()).await?;
    let fetched_rows = unwrap_rows(&raw, adapter.payload_keys()).map_or(0, <[Value]>::len);

    let archive_key = match &state.archive {
        Some(archive) => match archive.store(slug, run_id, &raw).await {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(source = slug, error = %e, "raw payload archive failed");
                None
            }
        },
        None => None,
    };

    let jobs = adapter.normalize(&raw)?;
    let upserted = state
        .store
        .upsert_jobs(&jobs)
        .await
        .map_err(IngestError::Store)?;

    info!(
        source = slug,
        fetched_rows,
        normalized = jobs.len(),
        upserted,
        "source ingestion complete"
    );

    Ok(SourceRunSummary {
        source_slug: slug.to_string(),
        fetched_rows,
        normalized: jobs.len(),
        upserted,
        archive_key,
        error: None,
    })
}

/// Runs every adapter concurrently. A failing source only marks its own summary.
pub async fn run_ingestion(state: AppState, adapters: Vec<Arc<dyn SourceAdapter>>) -> IngestionReport {
    let run_id = Uuid::new_v4();
    let mut tasks = JoinSet::new();

    for adapter in adapters {
        let state = state.clone();
        tasks.spawn(async move {
            let slug = adapter.slug();
            match ingest_source(&state, adapter.as_ref(), run_id).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(source = slug, error = %e, "source ingestion failed");
                    SourceRunSummary::failed(slug, e.to_string())
                }
            }
        });
    }

    let mut sources = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(summary) => sources.push(summary),
            Err(e) => error!("ingestion task aborted: {e}"),
        }
    }
    sources.sort_by(|a, b| a.source_slug.cmp(&b.source_slug));

    info!(%run_id, sources = sources.len(), "ingestion run finished");
    IngestionReport { run_id, sources }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::adapters::{remoteok::RemoteOkAdapter, remotive::RemotiveAdapter};
    use crate::ingest::fetcher::testing::CannedFetcher;
    use crate::state::test_state;
    use crate::store::memory::InMemoryStore;
    use crate::store::MatchStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_one_failing_source_does_not_block_others() {
        let fetcher = CannedFetcher::default()
            .with(
                RemoteOkAdapter.feed_url(),
                json!([{"legal": "terms"}, {"id": 1, "position": "Rust Engineer"}]),
            )
            .with(RemotiveAdapter.feed_url(), json!({"error": "maintenance"}));
        let store = Arc::new(InMemoryStore::default());
        let state = test_state(store.clone(), Arc::new(fetcher));

        let report = run_ingestion(
            state,
            vec![Arc::new(RemoteOkAdapter), Arc::new(RemotiveAdapter)],
        )
        .await;

        assert_eq!(report.sources.len(), 2);
        let remoteok = &report.sources[0];
        assert_eq!(remoteok.source_slug, "remoteok");
        assert_eq!(remoteok.fetched_rows, 2);
        assert_eq!(remoteok.normalized, 1);
        assert!(remoteok.error.is_none());

        let remotive = &report.sources[1];
        assert_eq!(remotive.source_slug, "remotive");
        assert!(remotive.error.is_some());

        let persisted = store.fetch_active_jobs(10).await.unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].job.external_id, "remoteok:1");
    }

    #[tokio::test]
    async fn test_reingestion_upserts_on_dedupe_key() {
        let payload = json!([{"id": 1, "position": "Rust Engineer"}]);
        let fetcher = CannedFetcher::default().with(RemoteOkAdapter.feed_url(), payload);
        let store = Arc::new(InMemoryStore::default());
        let state = test_state(store.clone(), Arc::new(fetcher));

        for _ in 0..2 {
            ingest_source(&state, &RemoteOkAdapter, Uuid::new_v4())
                .await
                .unwrap();
        }

        assert_eq!(store.fetch_active_jobs(10).await.unwrap().len(), 1);
    }
}
