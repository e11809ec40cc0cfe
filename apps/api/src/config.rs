use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on jobs scored per match request, newest first.
    pub catalog_limit: i64,
    pub resume_keyword_limit: usize,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    /// Raw payload archive. Disabled when `S3_BUCKET` is unset.
    pub archive: Option<ArchiveConfig>,
}

#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let archive = match std::env::var("S3_BUCKET") {
            Ok(bucket) if !bucket.trim().is_empty() => Some(ArchiveConfig {
                s3_bucket: bucket,
                s3_endpoint: require_env("S3_ENDPOINT")?,
                aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            _ => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            catalog_limit: parse_env("CATALOG_LIMIT", 400)?,
            resume_keyword_limit: parse_env("RESUME_KEYWORD_LIMIT", 40)?,
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", 20)?,
            user_agent: std::env::var("INGEST_USER_AGENT").unwrap_or_else(|_| {
                format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            }),
            archive,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/jobmatch_test".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            catalog_limit: 400,
            resume_keyword_limit: 40,
            fetch_timeout_secs: 5,
            user_agent: "jobmatch-test".to_string(),
            archive: None,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
