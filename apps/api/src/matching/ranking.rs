//! Ranking & Filter — scores a catalog for one candidate and orders the result.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::matching::enrichment::EnrichedCandidate;
use crate::matching::scoring::ScoringEngine;
use crate::models::job::JobRow;

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub job_id: Uuid,
    pub job: JobRow,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Drops jobs scoring `<= 0`, then sorts by score descending. Ties go to the
/// more recent posting (undated last), then to the lower job id.
pub fn rank_jobs(
    engine: &ScoringEngine,
    catalog: Vec<JobRow>,
    candidate: &EnrichedCandidate,
    today: NaiveDate,
) -> Vec<MatchResult> {
    let mut matches: Vec<MatchResult> = catalog
        .into_iter()
        .filter_map(|row| {
            let scored = engine.score(&row.job, candidate, today);
            (scored.score > 0.0).then(|| MatchResult {
                job_id: row.id,
                job: row,
                score: scored.score,
                reasons: scored.reasons,
            })
        })
        .collect();

    matches.sort_by(compare_matches);
    matches
}

fn compare_matches(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| match (a.job.job.posted_date, b.job.job.posted_date) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.job_id.cmp(&b.job_id))
}
