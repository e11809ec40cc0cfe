//! Matching: enrich a candidate, score the active catalog, rank the result.

pub mod enrichment;
pub mod handlers;
pub mod keywords;
pub mod ranking;
pub mod scoring;
