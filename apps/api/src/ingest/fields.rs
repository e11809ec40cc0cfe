//! Defensive field coercion shared by all source adapters.
//!
//! Every helper here is total: malformed upstream values become `None`,
//! never a panic and never a silent zero.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::job::RemoteType;

/// Numeric timestamps below this are read as seconds, at or above as milliseconds.
/// 1e12 ms is September 2001; 1e12 s is ~33,000 years out.
pub const SECONDS_MILLIS_BOUNDARY: f64 = 1e12;

/// Anything above this (as milliseconds) is treated as garbage.
pub const MAX_PLAUSIBLE_TIMESTAMP: f64 = 1e13;

/// Returns the first key whose value is a non-empty string (numbers are
/// stringified so numeric ids work too).
pub fn str_field(row: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| row.get(*key).and_then(scalar_string))
}

/// Non-empty trimmed string view of a scalar JSON value.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Collects strings from either an array of scalars or a single scalar.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Joins a list field into one display string, or `None` when it is empty.
pub fn joined_list(value: Option<&Value>, separator: &str) -> Option<String> {
    let items = string_list(value);
    (!items.is_empty()).then(|| items.join(separator))
}

/// Lenient number coercion. Strings are parsed as-is (no currency or
/// thousands-separator stripping); empty, unparsable and non-finite values
/// all map to `None`.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Converts a raw Unix timestamp to a calendar date (UTC).
///
/// Seconds vs milliseconds is decided by [`SECONDS_MILLIS_BOUNDARY`]; values
/// above [`MAX_PLAUSIBLE_TIMESTAMP`], non-positive or non-finite values are rejected.
pub fn date_from_unix_timestamp(raw: f64) -> Option<NaiveDate> {
    if !raw.is_finite() || raw <= 0.0 || raw > MAX_PLAUSIBLE_TIMESTAMP {
        return None;
    }
    let millis = if raw < SECONDS_MILLIS_BOUNDARY {
        raw * 1000.0
    } else {
        raw
    };
    DateTime::<Utc>::from_timestamp_millis(millis as i64).map(|dt| dt.date_naive())
}

/// Normalizes a raw date value to date-only precision.
///
/// Accepts RFC 3339, RFC 2822, `YYYY-MM-DD[ HH:MM:SS]`, and numeric timestamps
/// (as JSON numbers or digit-only strings).
pub fn normalize_date(value: Option<&Value>) -> Option<NaiveDate> {
    match value? {
        Value::Number(n) => date_from_unix_timestamp(n.as_f64()?),
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return s.parse::<f64>().ok().and_then(date_from_unix_timestamp);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Explicit source flag wins; otherwise look for "remote"/"hybrid" in the
/// location text. No signal at all stays `None`.
pub fn infer_remote_type(explicit: Option<RemoteType>, location: Option<&str>) -> Option<RemoteType> {
    if explicit.is_some() {
        return explicit;
    }
    let location = location?.to_lowercase();
    if location.contains("remote") {
        Some(RemoteType::Remote)
    } else if location.contains("hybrid") {
        Some(RemoteType::Hybrid)
    } else {
        None
    }
}

/// Builds the source-scoped external id `"<slug>:<first candidate>"`.
pub fn namespaced_id(source_slug: &str, candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .map(|c| format!("{source_slug}:{c}"))
}
