use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Work arrangement of a listing, as far as the source lets us tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteType {
    Remote,
    Hybrid,
    Onsite,
}

impl RemoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteType::Remote => "remote",
            RemoteType::Hybrid => "hybrid",
            RemoteType::Onsite => "onsite",
        }
    }

    /// Parses the persisted/wire label. Unknown labels map to `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "remote" => Some(RemoteType::Remote),
            "hybrid" => Some(RemoteType::Hybrid),
            "onsite" | "on-site" | "on_site" | "office" => Some(RemoteType::Onsite),
            _ => None,
        }
    }
}

/// Canonical job listing produced by a source adapter.
///
/// `(source_slug, external_id)` is the dedupe key. Values are rebuilt on every
/// ingestion run, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJob {
    pub source_slug: String,
    pub external_id: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub remote_type: Option<RemoteType>,
    pub posted_date: Option<NaiveDate>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub description: Option<String>,
    pub competitiveness_level: Option<String>,
    pub external_url: String,
    /// Original upstream row, kept for audit. Never read by matching.
    pub data_raw: Value,
}

impl NormalizedJob {
    /// Salary used for comparisons: max if disclosed, else min.
    pub fn effective_salary(&self) -> Option<f64> {
        self.salary_max.or(self.salary_min)
    }

    pub fn has_location_data(&self) -> bool {
        self.remote_type.is_some()
            || self
                .location
                .as_deref()
                .map(|l| !l.trim().is_empty())
                .unwrap_or(false)
    }
}

/// A persisted catalog row: the canonical job plus server-assigned fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRow {
    pub id: Uuid,
    pub is_active: bool,
    #[serde(flatten)]
    pub job: NormalizedJob,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for JobRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let remote_type: Option<String> = row.try_get("remote_type")?;
        Ok(JobRow {
            id: row.try_get("id")?,
            is_active: row.try_get("is_active")?,
            job: NormalizedJob {
                source_slug: row.try_get("source_slug")?,
                external_id: row.try_get("external_id")?,
                title: row.try_get("title")?,
                company: row.try_get("company")?,
                location: row.try_get("location")?,
                employment_type: row.try_get("employment_type")?,
                remote_type: remote_type.as_deref().and_then(RemoteType::parse),
                posted_date: row.try_get("posted_date")?,
                salary_min: row.try_get("salary_min")?,
                salary_max: row.try_get("salary_max")?,
                description: row.try_get("description")?,
                competitiveness_level: row.try_get("competitiveness_level")?,
                external_url: row.try_get("external_url")?,
                data_raw: row.try_get("data_raw")?,
            },
            created_at: row.try_get("created_at")?,
        })
    }
}
