//! Environment configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use skillquest_domain::UserId;

use crate::infrastructure::progress_http::DEFAULT_PROGRESS_BASE_URL;
use crate::infrastructure::resilient_progress::RetryConfig;

const DEFAULT_CATALOG_PATH: &str = "catalog.json";
const DEFAULT_SNAPSHOT_PATH: &str = "skillquest-snapshot.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Runtime configuration for the engine binary.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub progress_url: String,
    /// `None` runs as a guest: nothing is replicated or synced.
    pub user_id: Option<UserId>,
    pub catalog_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub retry: RetryConfig,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            progress_url: DEFAULT_PROGRESS_BASE_URL.to_string(),
            user_id: None,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            retry: RetryConfig::default(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Read `SKILLQUEST_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or blank keys use the default;
    /// unparseable numbers log a warning and use the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let retry = RetryConfig {
            max_retries: parse_or(
                get("SKILLQUEST_SYNC_MAX_RETRIES"),
                "SKILLQUEST_SYNC_MAX_RETRIES",
                defaults.retry.max_retries,
            ),
            base_delay_ms: parse_or(
                get("SKILLQUEST_SYNC_BASE_DELAY_MS"),
                "SKILLQUEST_SYNC_BASE_DELAY_MS",
                defaults.retry.base_delay_ms,
            ),
            max_delay_ms: parse_or(
                get("SKILLQUEST_SYNC_MAX_DELAY_MS"),
                "SKILLQUEST_SYNC_MAX_DELAY_MS",
                defaults.retry.max_delay_ms,
            ),
            ..defaults.retry
        };

        let timeout_secs = parse_or(
            get("SKILLQUEST_HTTP_TIMEOUT_SECS"),
            "SKILLQUEST_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        );

        Self {
            progress_url: get("SKILLQUEST_PROGRESS_URL").unwrap_or(defaults.progress_url),
            user_id: get("SKILLQUEST_USER_ID").map(UserId::new),
            catalog_path: get("SKILLQUEST_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            snapshot_path: get("SKILLQUEST_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            retry,
            http_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn parse_or<T: FromStr + Copy>(raw: Option<String>, key: &str, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, "Invalid numeric setting, using default");
            default
        }
    }
}
