use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::candidate::{
    CareerTrackRow, JobPreferencesRow, ProfileRow, ResumeRow, UserMatchPreferences,
};
use crate::models::job::{JobRow, NormalizedJob};
use crate::store::MatchStore;

/// In-memory store for handler and runner tests. `fail_*` flags simulate
/// collaborator outages.
#[derive(Default)]
pub struct InMemoryStore {
    pub profiles: HashMap<Uuid, ProfileRow>,
    pub resumes: HashMap<Uuid, ResumeRow>,
    pub preferences: HashMap<Uuid, JobPreferencesRow>,
    pub match_preferences: HashMap<Uuid, UserMatchPreferences>,
    pub tracks: Vec<CareerTrackRow>,
    pub jobs: Mutex<Vec<JobRow>>,
    pub fail_catalog: bool,
    pub fail_optional_reads: bool,
    /// Counts every read, so tests can assert nothing was touched.
    pub reads: Mutex<u32>,
}

impl InMemoryStore {
    fn touch(&self) {
        if let Ok(mut reads) = self.reads.lock() {
            *reads += 1;
        }
    }

    fn optional<T: Clone>(&self, value: Option<&T>) -> Result<Option<T>> {
        self.touch();
        if self.fail_optional_reads {
            return Err(anyhow!("simulated outage"));
        }
        Ok(value.cloned())
    }

    pub fn read_count(&self) -> u32 {
        self.reads.lock().map(|r| *r).unwrap_or_default()
    }

    pub fn with_jobs(jobs: Vec<NormalizedJob>) -> Self {
        let store = Self::default();
        let rows = jobs
            .into_iter()
            .map(|job| JobRow {
                id: Uuid::new_v4(),
                is_active: true,
                job,
                created_at: Utc::now(),
            })
            .collect();
        *store.jobs.lock().unwrap() = rows;
        store
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn fetch_profile(&self, candidate_id: Uuid) -> Result<Option<ProfileRow>> {
        self.optional(self.profiles.get(&candidate_id))
    }

    async fn fetch_latest_resume(&self, candidate_id: Uuid) -> Result<Option<ResumeRow>> {
        self.optional(self.resumes.get(&candidate_id))
    }

    async fn fetch_job_preferences(&self, candidate_id: Uuid) -> Result<Option<JobPreferencesRow>> {
        self.optional(self.preferences.get(&candidate_id))
    }

    async fn fetch_match_preferences(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<UserMatchPreferences>> {
        self.optional(self.match_preferences.get(&candidate_id))
    }

    async fn fetch_career_track(
        &self,
        candidate_id: Uuid,
        track_id: Option<Uuid>,
    ) -> Result<Option<CareerTrackRow>> {
        let track = self
            .tracks
            .iter()
            .filter(|t| t.user_id == candidate_id)
            .filter(|t| track_id.map_or(true, |id| t.id == id))
            .max_by_key(|t| t.created_at);
        self.optional(track)
    }

    async fn fetch_active_jobs(&self, limit: i64) -> Result<Vec<JobRow>> {
        self.touch();
        if self.fail_catalog {
            return Err(anyhow!("catalog unavailable"));
        }
        let mut jobs: Vec<JobRow> = self
            .jobs
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .iter()
            .filter(|j| j.is_active)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.job.posted_date.cmp(&a.job.posted_date));
        jobs.truncate(limit.max(0) as usize);
        Ok(jobs)
    }

    async fn upsert_jobs(&self, jobs: &[NormalizedJob]) -> Result<u64> {
        let mut rows = self.jobs.lock().map_err(|_| anyhow!("poisoned"))?;
        for job in jobs {
            match rows.iter_mut().find(|r| {
                r.job.source_slug == job.source_slug && r.job.external_id == job.external_id
            }) {
                Some(existing) => {
                    existing.job = job.clone();
                    existing.is_active = true;
                }
                None => rows.push(JobRow {
                    id: Uuid::new_v4(),
                    is_active: true,
                    job: job.clone(),
                    created_at: Utc::now(),
                }),
            }
        }
        Ok(jobs.len() as u64)
    }
}
