//! Scoring Engine — weighted additive score of one job against one candidate.
//!
//! Pure and deterministic: the caller passes `today`, so no clock is read here.
//! Every factor is independently capped; the total is clamped to [0, 100].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::matching::enrichment::{EnrichedCandidate, RemotePreference};
use crate::models::job::{NormalizedJob, RemoteType};

pub const MAX_SCORE: f64 = 100.0;

/// Point values and caps for every factor. `Default` is the fixed table the
/// engine has always used; per-user weights are not applied yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skill_per_match: f64,
    pub skill_cap: f64,

    pub title_exact: f64,
    pub title_per_token: f64,
    pub title_token_cap: f64,
    pub title_neutral: f64,

    pub keyword_per_match: f64,
    pub keyword_cap: f64,

    pub remote_match: f64,
    pub remote_unknown_location: f64,
    pub onsite_match: f64,
    pub remote_no_preference: f64,

    pub location_match: f64,

    pub salary_meets_floor: f64,
    pub salary_near_floor: f64,
    pub salary_below_floor: f64,
    pub salary_disclosed: f64,
    /// Share of the floor that still counts as "near" (inclusive).
    pub salary_near_ratio: f64,

    pub recency_3_days: f64,
    pub recency_7_days: f64,
    pub recency_30_days: f64,
    pub recency_older: f64,

    pub competition_low: f64,
    pub competition_moderate: f64,
    pub competition_high: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill_per_match: 5.0,
            skill_cap: 30.0,
            title_exact: 25.0,
            title_per_token: 5.0,
            title_token_cap: 20.0,
            title_neutral: 5.0,
            keyword_per_match: 5.0,
            keyword_cap: 25.0,
            remote_match: 15.0,
            remote_unknown_location: 5.0,
            onsite_match: 8.0,
            remote_no_preference: 3.0,
            location_match: 10.0,
            salary_meets_floor: 15.0,
            salary_near_floor: 8.0,
            salary_below_floor: 2.0,
            salary_disclosed: 5.0,
            salary_near_ratio: 0.8,
            recency_3_days: 15.0,
            recency_7_days: 10.0,
            recency_30_days: 6.0,
            recency_older: 2.0,
            competition_low: 5.0,
            competition_moderate: 4.0,
            competition_high: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobScore {
    pub score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    pub weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn score(
        &self,
        job: &NormalizedJob,
        candidate: &EnrichedCandidate,
        today: NaiveDate,
    ) -> JobScore {
        if let Some(keyword) = excluded_by(job, candidate) {
            return JobScore {
                score: 0.0,
                reasons: vec![format!("Excluded by your preferences: {keyword}")],
            };
        }

        let blob = format!("{} {}", job.title, job.description.as_deref().unwrap_or("")).to_lowercase();
        let mut reasons = Vec::new();

        let total = self.skill_fit(&blob, candidate, &mut reasons)
            + self.title_fit(job, candidate, &mut reasons)
            + self.keyword_fit(&blob, candidate, &mut reasons)
            + self.remote_fit(job, candidate, &mut reasons)
            + self.location_fit(job, candidate, &mut reasons)
            + self.salary_fit(job, candidate, &mut reasons)
            + self.recency(job, today, &mut reasons)
            + self.competitiveness(job, &mut reasons);

        JobScore {
            score: clamp_score(total),
            reasons,
        }
    }

    // ── Factors ─────────────────────────────────────────────────────────────

    fn skill_fit(&self, blob: &str, candidate: &EnrichedCandidate, reasons: &mut Vec<String>) -> f64 {
        capped_mentions(
            blob,
            &candidate.skills,
            self.weights.skill_per_match,
            self.weights.skill_cap,
            "Mentions your skill",
            reasons,
        )
    }

    fn title_fit(&self, job: &NormalizedJob, candidate: &EnrichedCandidate, reasons: &mut Vec<String>) -> f64 {
        let w = &self.weights;
        let targets: Vec<&str> = candidate
            .target_titles
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();

        if targets.is_empty() {
            reasons.push("No target titles set".to_string());
            return w.title_neutral;
        }

        let title = job.title.to_lowercase();
        if let Some(hit) = targets.iter().find(|t| title.contains(&t.to_lowercase())) {
            reasons.push(format!("Title matches your target: {hit}"));
            return w.title_exact;
        }

        let job_tokens = title_tokens(&title);
        let overlap: Vec<String> = targets
            .iter()
            .flat_map(|t| title_tokens(&t.to_lowercase()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|token| job_tokens.contains(token))
            .collect();
        if overlap.is_empty() {
            return 0.0;
        }
        reasons.push(format!("Title overlaps your targets: {}", overlap.join(", ")));
        (overlap.len() as f64 * w.title_per_token).min(w.title_token_cap)
    }

    fn keyword_fit(&self, blob: &str, candidate: &EnrichedCandidate, reasons: &mut Vec<String>) -> f64 {
        capped_mentions(
            blob,
            &candidate.include_keywords,
            self.weights.keyword_per_match,
            self.weights.keyword_cap,
            "Matches your interest",
            reasons,
        )
    }

    /// Rules apply in order; the first that fires wins.
    fn remote_fit(&self, job: &NormalizedJob, candidate: &EnrichedCandidate, reasons: &mut Vec<String>) -> f64 {
        let w = &self.weights;
        let job_remote = job.remote_type == Some(RemoteType::Remote);

        let (points, reason) = match candidate.remote_preference {
            None => (w.remote_no_preference, "No work-mode preference set"),
            Some(RemotePreference::Remote | RemotePreference::Hybrid) if job_remote => {
                (w.remote_match, "Remote role matches your work-mode preference")
            }
            Some(_) if !job.has_location_data() => {
                (w.remote_unknown_location, "Work mode not stated by the listing")
            }
            Some(RemotePreference::Onsite) if !job_remote => {
                (w.onsite_match, "On-site role matches your work-mode preference")
            }
            Some(_) => return 0.0,
        };
        reasons.push(reason.to_string());
        points
    }

    fn location_fit(&self, job: &NormalizedJob, candidate: &EnrichedCandidate, reasons: &mut Vec<String>) -> f64 {
        let Some(location) = job.location.as_deref().map(str::to_lowercase) else {
            return 0.0;
        };
        match candidate
            .preferred_locations
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty() && location.contains(&l.to_lowercase()))
        {
            Some(hit) => {
                reasons.push(format!("Located in your preferred area: {hit}"));
                self.weights.location_match
            }
            None => 0.0,
        }
    }

    fn salary_fit(&self, job: &NormalizedJob, candidate: &EnrichedCandidate, reasons: &mut Vec<String>) -> f64 {
        let w = &self.weights;
        let Some(salary) = job.effective_salary() else {
            return 0.0;
        };

        let (points, reason) = match candidate.min_salary.filter(|floor| *floor > 0.0) {
            None => (w.salary_disclosed, "Salary disclosed".to_string()),
            Some(floor) if salary >= floor => (w.salary_meets_floor, format!("Salary meets your floor of {floor:.0}")),
            Some(floor) if salary / floor >= w.salary_near_ratio => {
                (w.salary_near_floor, format!("Salary close to your floor of {floor:.0}"))
            }
            Some(floor) => (w.salary_below_floor, format!("Salary below your floor of {floor:.0}")),
        };
        reasons.push(reason);
        points
    }

    /// Future posting dates count as fresh.
    fn recency(&self, job: &NormalizedJob, today: NaiveDate, reasons: &mut Vec<String>) -> f64 {
        let w = &self.weights;
        let Some(posted) = job.posted_date else {
            return 0.0;
        };
        let age_days = (today - posted).num_days().max(0);

        let (points, reason) = match age_days {
            0..=3 => (w.recency_3_days, "Posted in the last 3 days"),
            4..=7 => (w.recency_7_days, "Posted in the last week"),
            8..=30 => (w.recency_30_days, "Posted in the last month"),
            _ => (w.recency_older, "Posted over a month ago"),
        };
        reasons.push(reason.to_string());
        points
    }

    fn competitiveness(&self, job: &NormalizedJob, reasons: &mut Vec<String>) -> f64 {
        let w = &self.weights;
        let label = job
            .competitiveness_level
            .as_deref()
            .map(|l| l.trim().to_lowercase())
            .unwrap_or_default();

        let (points, reason) = match label.as_str() {
            "low" => (w.competition_low, "Low competition"),
            "balanced" | "moderate" => (w.competition_moderate, "Moderate competition"),
            "high" => (w.competition_high, "High competition"),
            _ => return 0.0,
        };
        reasons.push(reason.to_string());
        points
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// First exclude keyword found in the job title or company.
fn excluded_by<'a>(job: &NormalizedJob, candidate: &'a EnrichedCandidate) -> Option<&'a str> {
    let haystack = format!("{} {}", job.title, job.company.as_deref().unwrap_or("")).to_lowercase();
    candidate
        .exclude_keywords
        .iter()
        .map(|k| k.trim())
        .find(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
}

/// `per_match` points per needle found in `blob`, one reason per counted
/// needle, stopping once `cap` is reached.
fn capped_mentions(
    blob: &str,
    needles: &[String],
    per_match: f64,
    cap: f64,
    label: &str,
    reasons: &mut Vec<String>,
) -> f64 {
    let mut points = 0.0;
    for needle in needles.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if points >= cap {
            break;
        }
        if blob.contains(&needle.to_lowercase()) {
            points += per_match;
            reasons.push(format!("{label}: {needle}"));
        }
    }
    points.min(cap)
}

fn title_tokens(title: &str) -> BTreeSet<String> {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 3)
        .map(String::from)
        .collect()
}

fn clamp_score(total: f64) -> f64 {
    if total.is_finite() {
        total.clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}
