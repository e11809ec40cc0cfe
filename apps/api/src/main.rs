mod config;
mod db;
mod errors;
mod ingest;
mod matching;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::ingest::archive::RawArchive;
use crate::ingest::fetcher::HttpFeedFetcher;
use crate::matching::keywords::FrequencyKeywordExtractor;
use crate::matching::scoring::{ScoringEngine, ScoringWeights};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (migrations applied on connect)
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize feed fetcher
    let fetcher = Arc::new(HttpFeedFetcher::new(
        &config.user_agent,
        config.fetch_timeout_secs,
    ));
    info!(
        "Feed fetcher initialized (timeout: {}s)",
        config.fetch_timeout_secs
    );

    // Initialize raw payload archive (optional)
    let archive = match &config.archive {
        Some(archive_config) => {
            let archive = RawArchive::connect(archive_config).await;
            info!("Raw payload archive enabled (bucket: {})", archive_config.s3_bucket);
            Some(archive)
        }
        None => {
            info!("S3_BUCKET not set; raw payload archive disabled");
            None
        }
    };

    // Build app state
    let state = AppState {
        store,
        fetcher,
        archive,
        keyword_extractor: Arc::new(FrequencyKeywordExtractor),
        scoring: ScoringEngine::new(ScoringWeights::default()),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
