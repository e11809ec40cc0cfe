use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::candidate::{
    CareerTrackRow, JobPreferencesRow, ProfileRow, ResumeRow, UserMatchPreferences,
};
use crate::models::job::{JobRow, NormalizedJob};
use crate::store::MatchStore;

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PgStore {
    async fn fetch_profile(&self, candidate_id: Uuid) -> Result<Option<ProfileRow>> {
        Ok(
            sqlx::query_as::<_, ProfileRow>("SELECT id, data, updated_at FROM profiles WHERE id = $1")
                .bind(candidate_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn fetch_latest_resume(&self, candidate_id: Uuid) -> Result<Option<ResumeRow>> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, user_id, extracted_text, created_at
            FROM resumes
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn fetch_job_preferences(&self, candidate_id: Uuid) -> Result<Option<JobPreferencesRow>> {
        Ok(sqlx::query_as::<_, JobPreferencesRow>(
            r#"
            SELECT user_id, remote_preference, preferred_locations, min_salary,
                   excluded_titles, excluded_companies
            FROM job_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn fetch_match_preferences(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<UserMatchPreferences>> {
        Ok(sqlx::query_as::<_, UserMatchPreferences>(
            r#"
            SELECT user_id, salary_weight, location_weight, remote_weight, mission_weight,
                   growth_weight, location_mode, salary_floor_remote, salary_floor_local
            FROM user_match_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn fetch_career_track(
        &self,
        candidate_id: Uuid,
        track_id: Option<Uuid>,
    ) -> Result<Option<CareerTrackRow>> {
        Ok(sqlx::query_as::<_, CareerTrackRow>(
            r#"
            SELECT id, user_id, name, target_titles, keywords, created_at
            FROM career_tracks
            WHERE user_id = $1 AND ($2::uuid IS NULL OR id = $2)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(candidate_id)
        .bind(track_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn fetch_active_jobs(&self, limit: i64) -> Result<Vec<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            SELECT *
            FROM jobs
            WHERE is_active
            ORDER BY posted_date DESC NULLS LAST, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn upsert_jobs(&self, jobs: &[NormalizedJob]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for job in jobs {
            let result = sqlx::query(
                r#"
                INSERT INTO jobs
                    (source_slug, external_id, title, company, location, employment_type,
                     remote_type, posted_date, salary_min, salary_max, description,
                     competitiveness_level, external_url, data_raw, is_active)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, TRUE)
                ON CONFLICT (source_slug, external_id) DO UPDATE SET
                    title = EXCLUDED.title,
                    company = EXCLUDED.company,
                    location = EXCLUDED.location,
                    employment_type = EXCLUDED.employment_type,
                    remote_type = EXCLUDED.remote_type,
                    posted_date = EXCLUDED.posted_date,
                    salary_min = EXCLUDED.salary_min,
                    salary_max = EXCLUDED.salary_max,
                    description = EXCLUDED.description,
                    competitiveness_level = EXCLUDED.competitiveness_level,
                    external_url = EXCLUDED.external_url,
                    data_raw = EXCLUDED.data_raw,
                    is_active = TRUE
                "#,
            )
            .bind(&job.source_slug)
            .bind(&job.external_id)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(&job.employment_type)
            .bind(job.remote_type.map(|r| r.as_str()))
            .bind(job.posted_date)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(&job.description)
            .bind(&job.competitiveness_level)
            .bind(&job.external_url)
            .bind(&job.data_raw)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        info!("Upserted {written} job rows");
        Ok(written)
    }
}
