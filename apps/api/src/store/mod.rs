//! Data-store seam for matching and ingestion.
//!
//! Carried in `AppState` as `Arc<dyn MatchStore>`; `PgStore` is the production
//! backend, tests use the in-memory store.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::candidate::{
    CareerTrackRow, JobPreferencesRow, ProfileRow, ResumeRow, UserMatchPreferences,
};
use crate::models::job::{JobRow, NormalizedJob};

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn fetch_profile(&self, candidate_id: Uuid) -> Result<Option<ProfileRow>>;

    /// Most recent resume by creation time.
    async fn fetch_latest_resume(&self, candidate_id: Uuid) -> Result<Option<ResumeRow>>;

    async fn fetch_job_preferences(&self, candidate_id: Uuid) -> Result<Option<JobPreferencesRow>>;

    async fn fetch_match_preferences(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<UserMatchPreferences>>;

    /// The named track when `track_id` is given, otherwise the candidate's latest one.
    async fn fetch_career_track(
        &self,
        candidate_id: Uuid,
        track_id: Option<Uuid>,
    ) -> Result<Option<CareerTrackRow>>;

    /// Active jobs, newest posting first, at most `limit` rows.
    async fn fetch_active_jobs(&self, limit: i64) -> Result<Vec<JobRow>>;

    /// Inserts or refreshes jobs keyed on `(source_slug, external_id)`.
    /// Returns the number of rows written.
    async fn upsert_jobs(&self, jobs: &[NormalizedJob]) -> Result<u64>;
}
