//! Axum route handlers for the Matching API.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::enrichment::{enrich, gather_sources};
use crate::matching::ranking::{rank_jobs, MatchResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Ids arrive as raw strings so a missing or malformed id is our 400, not
/// the extractor's.
#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub candidate_id: Option<String>,
    pub track_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchResult>,
    pub count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/matches?candidate_id=<uuid>&track_id=<uuid?>
///
/// Only a bad candidate id (400) or an unavailable job catalog (502) fail the
/// request; every optional enrichment source degrades silently.
pub async fn handle_get_matches(
    State(state): State<AppState>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<MatchResponse>, AppError> {
    let candidate_id = parse_id("candidate_id", query.candidate_id.as_deref())?
        .ok_or_else(|| AppError::Validation("candidate_id is required".to_string()))?;
    let track_id = parse_id("track_id", query.track_id.as_deref())?;

    let (sources, catalog) = tokio::join!(
        gather_sources(state.store.as_ref(), candidate_id, track_id),
        state.store.fetch_active_jobs(state.config.catalog_limit),
    );
    let catalog = catalog.map_err(|e| {
        error!(%candidate_id, error = %e, "job catalog fetch failed");
        AppError::Upstream("Job catalog is unavailable".to_string())
    })?;

    let candidate = enrich(
        sources,
        state.keyword_extractor.as_ref(),
        state.config.resume_keyword_limit,
    );
    let catalog_size = catalog.len();
    let matches = rank_jobs(&state.scoring, catalog, &candidate, Utc::now().date_naive());

    debug!(%candidate_id, catalog_size, matches = matches.len(), "matches ranked");

    Ok(Json(MatchResponse {
        count: matches.len(),
        matches,
    }))
}

/// Blank counts as absent.
fn parse_id(name: &str, raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{name} must be a UUID, got '{value}'"))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::ingest::fetcher::testing::CannedFetcher;
    use crate::models::candidate::ProfileRow;
    use crate::models::job::{NormalizedJob, RemoteType};
    use crate::routes::build_router;
    use crate::state::test_state;
    use crate::store::memory::InMemoryStore;

    use super::*;

    async fn get(store: Arc<InMemoryStore>, uri: &str) -> (StatusCode, Value) {
        let app = build_router(test_state(store, Arc::new(CannedFetcher::default())));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn job(external_id: &str, title: &str, description: &str, age_days: i64) -> NormalizedJob {
        NormalizedJob {
            source_slug: "remotive".to_string(),
            external_id: format!("remotive:{external_id}"),
            title: title.to_string(),
            company: Some("Acme".to_string()),
            location: Some("Remote".to_string()),
            employment_type: Some("full_time".to_string()),
            remote_type: Some(RemoteType::Remote),
            posted_date: Some(Utc::now().date_naive() - Duration::days(age_days)),
            salary_min: None,
            salary_max: None,
            description: Some(description.to_string()),
            competitiveness_level: None,
            external_url: format!("https://remotive.com/jobs/{external_id}"),
            data_raw: json!({}),
        }
    }

    #[tokio::test]
    async fn test_missing_candidate_id_is_rejected_without_reads() {
        let store = Arc::new(InMemoryStore::default());
        let (status, body) = get(store.clone(), "/api/v1/matches").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_ids_are_rejected() {
        let store = Arc::new(InMemoryStore::default());
        let (status, _) = get(store.clone(), "/api/v1/matches?candidate_id=not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let uri = format!("/api/v1/matches?candidate_id={}&track_id=nope", Uuid::new_v4());
        let (status, _) = get(store.clone(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_catalog_returns_empty_list() {
        let uri = format!("/api/v1/matches?candidate_id={}", Uuid::new_v4());
        let (status, body) = get(Arc::new(InMemoryStore::default()), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"matches": [], "count": 0}));
    }

    #[tokio::test]
    async fn test_catalog_failure_is_upstream_error() {
        let store = InMemoryStore {
            fail_catalog: true,
            ..Default::default()
        };
        let uri = format!("/api/v1/matches?candidate_id={}", Uuid::new_v4());
        let (status, body) = get(Arc::new(store), &uri).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].is_string());
        assert!(body.get("matches").is_none());
    }

    #[tokio::test]
    async fn test_optional_source_outage_degrades_gracefully() {
        let mut store = InMemoryStore::with_jobs(vec![job("1", "Engineer", "", 1)]);
        store.fail_optional_reads = true;
        let uri = format!("/api/v1/matches?candidate_id={}", Uuid::new_v4());
        let (status, body) = get(Arc::new(store), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_matches_ranked_for_profile() {
        let candidate_id = Uuid::new_v4();
        let mut store = InMemoryStore::with_jobs(vec![
            job("1", "Office Manager", "calendars", 40),
            job("2", "Senior Rust Engineer", "Rust, Kafka and Postgres", 1),
            job("3", "Gambling Platform Engineer", "rust", 1),
        ]);
        store.profiles.insert(
            candidate_id,
            ProfileRow {
                id: candidate_id,
                data: json!({
                    "skills_primary": ["Rust", "Kafka"],
                    "target_titles": ["Rust Engineer"],
                    "remote_preference": "remote",
                    "exclude_keywords": ["gambling"]
                }),
                updated_at: Utc::now(),
            },
        );

        let uri = format!("/api/v1/matches?candidate_id={candidate_id}");
        let (status, body) = get(Arc::new(store), &uri).await;

        assert_eq!(status, StatusCode::OK);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(body["count"], matches.len());
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["job"]["external_id"], "remotive:2");
        assert_eq!(matches[0]["job_id"], matches[0]["job"]["id"]);

        let scores: Vec<f64> = matches.iter().map(|m| m["score"].as_f64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|s| *s > 0.0 && *s <= 100.0));
        assert!(matches[0]["reasons"]
            .as_array()
            .unwrap()
            .contains(&json!("Mentions your skill: Rust")));
    }
}
