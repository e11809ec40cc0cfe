use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::ingest::FeedError;

/// Fetches one source's native JSON payload.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, FeedError>;
}

/// Unauthenticated HTTP fetcher used in production.
#[derive(Clone)]
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .user_agent(user_agent)
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        debug!(url, "fetched feed payload");
        Ok(payload)
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Serves fixed payloads by URL; unknown URLs answer with an error body.
    #[derive(Default)]
    pub struct CannedFetcher {
        payloads: HashMap<String, Value>,
    }

    impl CannedFetcher {
        pub fn with(mut self, url: &str, payload: Value) -> Self {
            self.payloads.insert(url.to_string(), payload);
            self
        }
    }

    #[async_trait]
    impl FeedFetcher for CannedFetcher {
        async fn fetch(&self, url: &str) -> Result<Value, FeedError> {
            Ok(self
                .payloads
                .get(url)
                .cloned()
                .unwrap_or_else(|| serde_json::json!({"error": "not found"})))
        }
    }
}
