#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Base profile record. `data` has no fixed shape: several historical field
/// names can carry the same attribute.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub extracted_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct JobPreferencesRow {
    pub user_id: Uuid,
    pub remote_preference: Option<String>,
    pub preferred_locations: Vec<String>,
    pub min_salary: Option<f64>,
    pub excluded_titles: Vec<String>,
    pub excluded_companies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerTrackRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_titles: Vec<String>,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-user weighting strategy. Loaded with the candidate but not applied to
/// the scoring formula yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserMatchPreferences {
    pub user_id: Uuid,
    pub salary_weight: f64,
    pub location_weight: f64,
    pub remote_weight: f64,
    pub mission_weight: f64,
    pub growth_weight: f64,
    pub location_mode: String,
    pub salary_floor_remote: Option<f64>,
    pub salary_floor_local: Option<f64>,
}
