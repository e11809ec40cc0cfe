//! Job Normalizer — runs one adapter over a batch of raw rows.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::ingest::adapters::SourceAdapter;
use crate::models::job::NormalizedJob;

/// Normalizes each row in isolation. Malformed rows are logged and dropped;
/// a later row repeating an earlier `(source_slug, external_id)` is dropped too.
/// Output order follows input order.
pub fn normalize_batch<A: SourceAdapter + ?Sized>(adapter: &A, rows: &[Value]) -> Vec<NormalizedJob> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut jobs = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let job = match adapter.normalize_row(row) {
            Ok(job) => job,
            Err(e) => {
                warn!(source = adapter.slug(), index, reason = %e, "dropping malformed job row");
                continue;
            }
        };

        if !seen.insert((job.source_slug.clone(), job.external_id.clone())) {
            debug!(
                source = adapter.slug(),
                external_id = %job.external_id,
                "dropping duplicate job row"
            );
            continue;
        }
        jobs.push(job);
    }

    jobs
}
