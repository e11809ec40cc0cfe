//! Profile Enrichment — merges the base profile, career track, job preferences
//! and latest resume into one `EnrichedCandidate`.
//!
//! Precedence: explicit structured data > resume-derived inference > empty.
//! A source only fills fields that are still empty; exclude lists are unioned.
//! Every optional read arrives as `Sourced<T>`, so a missing or failed source
//! can only shrink the candidate, never fail the request.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ingest::fields::coerce_number;
use crate::matching::keywords::KeywordExtractor;
use crate::models::candidate::{
    CareerTrackRow, JobPreferencesRow, ResumeRow, UserMatchPreferences,
};
use crate::store::MatchStore;

// ────────────────────────────────────────────────────────────────────────────
// Alias tables (first non-empty alias wins)
// ────────────────────────────────────────────────────────────────────────────

pub const HEADLINE_ALIASES: &[&str] = &["headline", "professional_headline", "current_title"];
pub const SUMMARY_ALIASES: &[&str] = &["summary", "professional_summary", "bio", "about"];
pub const SKILLS_ALIASES: &[&str] = &["skills_primary", "skills", "primary_skills", "core_skills"];
pub const TARGET_TITLE_ALIASES: &[&str] = &["target_titles", "target_roles", "desired_titles"];
pub const LOCATION_ALIASES: &[&str] = &["preferred_locations", "locations", "location_preferences"];
pub const MIN_SALARY_ALIASES: &[&str] = &["min_salary", "salary_min", "desired_salary", "salary_floor"];
pub const REMOTE_ALIASES: &[&str] = &["remote_preference", "work_mode", "remote"];
pub const INCLUDE_ALIASES: &[&str] = &["include_keywords", "keywords", "interests"];
pub const EXCLUDE_ALIASES: &[&str] = &["exclude_keywords", "excluded_keywords", "dealbreakers"];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemotePreference {
    Remote,
    Hybrid,
    Onsite,
}

impl RemotePreference {
    /// "any"/"flexible" and unknown labels mean no stated preference.
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(RemotePreference::Remote),
            Value::String(s) => match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
                "remote" | "remote_only" | "remote_first" | "fully_remote" => {
                    Some(RemotePreference::Remote)
                }
                "hybrid" => Some(RemotePreference::Hybrid),
                "onsite" | "on_site" | "in_office" | "office" => Some(RemotePreference::Onsite),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Request-scoped view of a candidate, as consumed by scoring.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichedCandidate {
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub resume_keywords: Vec<String>,
    pub target_titles: Vec<String>,
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
    pub remote_preference: Option<RemotePreference>,
    pub preferred_locations: Vec<String>,
    pub min_salary: Option<f64>,
    /// Loaded for completeness; the scoring formula does not read it.
    pub match_preferences: Option<UserMatchPreferences>,
}

/// Why an optional source contributed nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Absent {
    Missing,
    Failed(String),
}

pub type Sourced<T> = Result<T, Absent>;

/// All optional inputs for one candidate.
#[derive(Debug, Clone)]
pub struct EnrichmentSources {
    pub profile: Sourced<Value>,
    pub career_track: Sourced<CareerTrackRow>,
    pub job_preferences: Sourced<JobPreferencesRow>,
    pub resume: Sourced<ResumeRow>,
    pub match_preferences: Sourced<UserMatchPreferences>,
}

impl Default for EnrichmentSources {
    fn default() -> Self {
        Self {
            profile: Err(Absent::Missing),
            career_track: Err(Absent::Missing),
            job_preferences: Err(Absent::Missing),
            resume: Err(Absent::Missing),
            match_preferences: Err(Absent::Missing),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Loading
// ────────────────────────────────────────────────────────────────────────────

/// Converts a collaborator read into `Sourced<T>`, logging failures.
pub fn soften<T>(source: &'static str, candidate_id: Uuid, read: anyhow::Result<Option<T>>) -> Sourced<T> {
    match read {
        Ok(Some(value)) => Ok(value),
        Ok(None) => {
            debug!(source, %candidate_id, "enrichment source empty");
            Err(Absent::Missing)
        }
        Err(e) => {
            warn!(source, %candidate_id, error = %e, "enrichment source unavailable; continuing without it");
            Err(Absent::Failed(e.to_string()))
        }
    }
}

/// Issues all optional reads concurrently. Never fails.
pub async fn gather_sources(
    store: &dyn MatchStore,
    candidate_id: Uuid,
    track_id: Option<Uuid>,
) -> EnrichmentSources {
    let (profile, career_track, job_preferences, resume, match_preferences) = tokio::join!(
        store.fetch_profile(candidate_id),
        store.fetch_career_track(candidate_id, track_id),
        store.fetch_job_preferences(candidate_id),
        store.fetch_latest_resume(candidate_id),
        store.fetch_match_preferences(candidate_id),
    );

    EnrichmentSources {
        profile: soften("profile", candidate_id, profile).map(|p| p.data),
        career_track: soften("career_track", candidate_id, career_track),
        job_preferences: soften("job_preferences", candidate_id, job_preferences),
        resume: soften("resume", candidate_id, resume),
        match_preferences: soften("match_preferences", candidate_id, match_preferences),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Merge
// ────────────────────────────────────────────────────────────────────────────

/// Builds the candidate from whatever sources are present.
pub fn enrich(
    sources: EnrichmentSources,
    extractor: &dyn KeywordExtractor,
    keyword_limit: usize,
) -> EnrichedCandidate {
    let mut candidate = EnrichedCandidate::default();

    if let Ok(profile) = &sources.profile {
        candidate.headline = first_non_empty(profile, HEADLINE_ALIASES).and_then(text_of);
        candidate.summary = first_non_empty(profile, SUMMARY_ALIASES).and_then(text_of);
        candidate.skills = dedupe(list_of(first_non_empty(profile, SKILLS_ALIASES)));
        candidate.target_titles = dedupe(list_of(first_non_empty(profile, TARGET_TITLE_ALIASES)));
        candidate.preferred_locations = dedupe(list_of(first_non_empty(profile, LOCATION_ALIASES)));
        candidate.include_keywords = dedupe(list_of(first_non_empty(profile, INCLUDE_ALIASES)));
        candidate.exclude_keywords = dedupe(list_of(first_non_empty(profile, EXCLUDE_ALIASES)));
        candidate.min_salary = positive(coerce_number(first_non_empty(profile, MIN_SALARY_ALIASES)));
        candidate.remote_preference =
            first_non_empty(profile, REMOTE_ALIASES).and_then(RemotePreference::parse);
    }

    if let Ok(track) = &sources.career_track {
        fill_list(&mut candidate.target_titles, track.target_titles.clone());
        fill_list(&mut candidate.include_keywords, track.keywords.clone());
    }

    if let Ok(prefs) = &sources.job_preferences {
        if candidate.remote_preference.is_none() {
            candidate.remote_preference = prefs
                .remote_preference
                .as_deref()
                .and_then(|p| RemotePreference::parse(&Value::String(p.to_string())));
        }
        fill_list(&mut candidate.preferred_locations, prefs.preferred_locations.clone());
        if candidate.min_salary.is_none() {
            candidate.min_salary = positive(prefs.min_salary);
        }
        union_into(&mut candidate.exclude_keywords, &prefs.excluded_titles);
        union_into(&mut candidate.exclude_keywords, &prefs.excluded_companies);
    }

    if let Ok(resume) = &sources.resume {
        if let Some(text) = resume.extracted_text.as_deref().filter(|t| !t.trim().is_empty()) {
            candidate.resume_keywords = extractor.extract(text, keyword_limit);
        }
    }
    // Resume inference only fills a wholly empty skill set.
    fill_list(&mut candidate.skills, candidate.resume_keywords.clone());

    candidate.match_preferences = sources.match_preferences.ok();
    candidate
}

/// First alias whose value is non-null, not a blank string and not an empty array.
pub fn first_non_empty<'a>(obj: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| obj.get(*alias))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        })
}

fn text_of(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Arrays of strings, or one delimited string ("Rust, Go; SQL").
fn list_of(value: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        Some(Value::String(s)) => s.split([',', ';', '\n']).map(String::from).collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Case-insensitive dedupe keeping the first spelling.
fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.to_lowercase()))
        .collect()
}

fn fill_list(target: &mut Vec<String>, values: Vec<String>) {
    if target.is_empty() {
        *target = dedupe(values);
    }
}

fn union_into(target: &mut Vec<String>, values: &[String]) {
    let merged = target.iter().chain(values).cloned().collect();
    *target = dedupe(merged);
}
