use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::config::ArchiveConfig;

/// Keeps a copy of every fetched upstream payload in S3 for debugging
/// adapter regressions.
#[derive(Clone)]
pub struct RawArchive {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl RawArchive {
    /// Builds an S3 client for MinIO (local) or AWS (production).
    pub async fn connect(config: &ArchiveConfig) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "jobmatch-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: config.s3_bucket.clone(),
        }
    }

    /// Uploads the payload and returns its object key.
    pub async fn store(&self, source_slug: &str, run_id: Uuid, payload: &Value) -> Result<String> {
        let key = archive_key(source_slug, run_id);
        let body = serde_json::to_vec(payload)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        info!("Archived raw payload to s3://{}/{}", self.bucket, key);
        Ok(key)
    }
}

pub fn archive_key(source_slug: &str, run_id: Uuid) -> String {
    format!("ingest/{source_slug}/{run_id}.json")
}
