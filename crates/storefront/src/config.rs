//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CARTLANE_API_ENDPOINT` - Commerce API base URL (default: `http://localhost:8082/api/v1`)
//! - `CARTLANE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `CARTLANE_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `CARTLANE_SEARCH_DEBOUNCE_MS` - Search debounce delay (default: 500)
//! - `CARTLANE_SESSION_FILE` - Session store path (default: `.cartlane-session.json`)
//! - `CARTLANE_LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_ENDPOINT: &str = "http://localhost:8082/api/v1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
const DEFAULT_SESSION_FILE: &str = ".cartlane-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Commerce API configuration
    pub api: ApiConfig,
    /// Delay between the last keystroke and the search request
    pub search_debounce: Duration,
    /// Path of the JSON file backing the session store
    pub session_file: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Commerce API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it
    pub endpoint: Url,
    /// Timeout applied to every request
    pub request_timeout: Duration,
    /// How long the product catalog is cached
    pub catalog_cache_ttl: Duration,
}

impl ApiConfig {
    /// Create an API configuration with default timeouts for `endpoint`.
    #[must_use]
    pub const fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CATALOG_CACHE_TTL_SECS),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api = ApiConfig::from_lookup(&lookup)?;
        let search_debounce = Duration::from_millis(parse_or_default(
            &lookup,
            "CARTLANE_SEARCH_DEBOUNCE_MS",
            DEFAULT_SEARCH_DEBOUNCE_MS,
        )?);
        let session_file = lookup("CARTLANE_SESSION_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);
        let log_format = parse_or_default(&lookup, "CARTLANE_LOG_FORMAT", LogFormat::Text)?;
        let sentry_dsn = lookup("SENTRY_DSN").filter(|v| !v.is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty());

        Ok(Self {
            api,
            search_debounce,
            session_file,
            log_format,
            sentry_dsn,
            sentry_environment,
        })
    }
}

impl ApiConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup("CARTLANE_API_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());
        let endpoint = parse_endpoint(&endpoint).map_err(|e| {
            ConfigError::InvalidEnvVar("CARTLANE_API_ENDPOINT".to_string(), e)
        })?;

        Ok(Self {
            endpoint,
            request_timeout: Duration::from_secs(parse_or_default(
                lookup,
                "CARTLANE_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            catalog_cache_ttl: Duration::from_secs(parse_or_default(
                lookup,
                "CARTLANE_CATALOG_CACHE_TTL_SECS",
                DEFAULT_CATALOG_CACHE_TTL_SECS,
            )?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the API base URL. Only `http` and `https` are accepted.
fn parse_endpoint(value: &str) -> Result<Url, String> {
    let url = Url::parse(value.trim_end_matches('/')).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme `{other}`")),
    }
}

/// Parse an optional variable, falling back to `default` when it is unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
