//! Source adapters — one per upstream job board.
//!
//! An adapter only knows its board's row shape. Payload unwrapping, row
//! isolation and dedupe are shared through [`SourceAdapter::normalize`].

pub mod arbeitnow;
pub mod himalayas;
pub mod jobicy;
pub mod remoteok;
pub mod remotive;
pub mod themuse;

use std::sync::Arc;

use serde_json::Value;

use crate::ingest::normalizer::normalize_batch;
use crate::ingest::{FeedError, RowError};
use crate::models::job::NormalizedJob;

/// Wrapper keys probed on object payloads, after any adapter-specific keys.
const COMMON_PAYLOAD_KEYS: &[&str] = &["jobs", "data", "results"];

pub trait SourceAdapter: Send + Sync {
    /// Stable identity stored as `source_slug` and used as the id namespace.
    fn slug(&self) -> &'static str;

    /// Public endpoint returning the board's native JSON.
    fn feed_url(&self) -> &'static str;

    /// Provider-specific wrapper keys, probed before the common ones.
    fn payload_keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn normalize_row(&self, row: &Value) -> Result<NormalizedJob, RowError>;

    /// Normalizes a whole raw payload. Only an unrecognisable payload shape is
    /// an error; bad rows just shorten the result.
    fn normalize(&self, raw: &Value) -> Result<Vec<NormalizedJob>, FeedError> {
        let rows = unwrap_rows(raw, self.payload_keys()).ok_or_else(|| {
            FeedError::UnrecognisedShape {
                source_slug: self.slug().to_string(),
            }
        })?;
        Ok(normalize_batch(self, rows))
    }
}

/// Finds the row array: the payload itself, or the first array under one of
/// the wrapper keys.
pub fn unwrap_rows<'a>(raw: &'a Value, extra_keys: &[&str]) -> Option<&'a [Value]> {
    if let Value::Array(rows) = raw {
        return Some(rows);
    }
    let object = raw.as_object()?;
    extra_keys
        .iter()
        .chain(COMMON_PAYLOAD_KEYS)
        .find_map(|key| object.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
}

/// Every adapter the service knows, in a stable order.
pub fn all_adapters() -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(remoteok::RemoteOkAdapter),
        Arc::new(remotive::RemotiveAdapter),
        Arc::new(arbeitnow::ArbeitnowAdapter),
        Arc::new(jobicy::JobicyAdapter),
        Arc::new(themuse::TheMuseAdapter),
        Arc::new(himalayas::HimalayasAdapter),
    ]
}

pub fn adapter_for_source(slug: &str) -> Option<Arc<dyn SourceAdapter>> {
    all_adapters()
        .into_iter()
        .find(|adapter| adapter.slug().eq_ignore_ascii_case(slug.trim()))
}
