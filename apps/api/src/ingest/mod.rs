// Job ingestion: per-source adapters translate upstream payloads into
// `NormalizedJob`s, the normalizer isolates row failures, the runner fetches
// and persists each source independently.

pub mod adapters;
pub mod archive;
pub mod fetcher;
pub mod fields;
pub mod handlers;
pub mod normalizer;
pub mod runner;

use thiserror::Error;

/// Why a single upstream row was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("row is not a JSON object")]
    NotAnObject,

    #[error("row has no id, url or title to identify it")]
    MissingId,

    #[error("row has no title")]
    MissingTitle,

    #[error("row has no apply url")]
    MissingUrl,
}

/// Failure to obtain or recognise a whole upstream payload.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unrecognised payload shape from {source_slug}")]
    UnrecognisedShape { source_slug: String },
}
