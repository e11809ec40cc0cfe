pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ingest::handlers as ingest;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/matches", get(matching::handle_get_matches))
        // Ingestion API
        .route("/api/v1/sources", get(ingest::handle_list_sources))
        .route("/api/v1/ingest", post(ingest::handle_ingest_all))
        .route("/api/v1/ingest/:source", post(ingest::handle_ingest_source))
        .with_state(state)
}
