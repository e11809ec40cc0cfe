use std::sync::Arc;

use crate::config::Config;
use crate::ingest::archive::RawArchive;
use crate::ingest::fetcher::FeedFetcher;
use crate::matching::keywords::KeywordExtractor;
use crate::matching::scoring::ScoringEngine;
use crate::store::MatchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchStore>,
    pub fetcher: Arc<dyn FeedFetcher>,
    /// `None` when no S3 bucket is configured.
    pub archive: Option<RawArchive>,
    /// Pluggable resume keyword extractor. Default: FrequencyKeywordExtractor.
    pub keyword_extractor: Arc<dyn KeywordExtractor>,
    pub scoring: ScoringEngine,
    pub config: Config,
}

#[cfg(test)]
pub fn test_state(store: Arc<dyn MatchStore>, fetcher: Arc<dyn FeedFetcher>) -> AppState {
    AppState {
        store,
        fetcher,
        archive: None,
        keyword_extractor: Arc::new(crate::matching::keywords::FrequencyKeywordExtractor),
        scoring: ScoringEngine::default(),
        config: Config::for_tests(),
    }
}
