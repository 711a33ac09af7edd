//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CONSOLE_API_URL` - Backend base URL (default: `http://localhost:8000/`)
//! - `CONSOLE_PAGE_LIMIT` - Products per page (default: 10)
//! - `CONSOLE_REVIEW_LIMIT` - Reviews per drawer page (default: 5)
//! - `CONSOLE_REVIEWS_PER_PAGE` - Reviews revealed per step on the all-reviews screen (default: 10)
//! - `CONSOLE_POPUP_TEARDOWN_MS` - Delay before a closed popup drops its content (default: 300)
//! - `CONSOLE_SESSION_FAIL_OPEN` - Allow protected routes when no session storage exists (default: true)
//! - `CONSOLE_SESSION_FILE` - File holding the session marker between runs
//! - `CONSOLE_REQUEST_TIMEOUT_SECS` - HTTP timeout; unset means no timeout
//! - `CONSOLE_DEDUPE_IDS` - Drop entities whose id is already loaded (default: false)
//! - `CONSOLE_LOG_JSON` - Emit JSON logs (CLI only)
//! - `SENTRY_DSN` - Sentry error tracking DSN (CLI only)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::session::SessionGateConfig;

const DEFAULT_API_URL: &str = "http://localhost:8000/";
const DEFAULT_PAGE_LIMIT: u32 = 10;
const DEFAULT_REVIEW_LIMIT: u32 = 5;
const DEFAULT_REVIEWS_PER_PAGE: usize = 10;
const DEFAULT_POPUP_TEARDOWN_MS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend base URL; always ends with `/` so endpoint names join under it
    pub api_url: Url,
    /// Product feed page size
    pub page_limit: u32,
    /// Review drawer page size
    pub review_limit: u32,
    /// Client-side step on the all-reviews screen
    pub reviews_per_page: usize,
    /// Delay between hiding a popup and dropping its content
    pub popup_teardown: Duration,
    /// Session gate behaviour
    pub session: SessionGateConfig,
    /// Where the session marker persists between CLI runs
    pub session_file: Option<PathBuf>,
    /// Optional HTTP request timeout
    pub request_timeout: Option<Duration>,
    /// Whether list accumulators drop already-loaded ids
    pub dedupe_ids: bool,
    /// JSON log output
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_limit: DEFAULT_PAGE_LIMIT,
            review_limit: DEFAULT_REVIEW_LIMIT,
            reviews_per_page: DEFAULT_REVIEWS_PER_PAGE,
            popup_teardown: Duration::from_millis(DEFAULT_POPUP_TEARDOWN_MS),
            session: SessionGateConfig::default(),
            session_file: None,
            request_timeout: None,
            dedupe_ids: false,
            log_json: false,
            sentry_dsn: None,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("CONSOLE_API_URL") {
            Some(raw) => parse_api_url(&raw)?,
            None => default_api_url(),
        };

        let page_limit = parse_positive(&lookup, "CONSOLE_PAGE_LIMIT", DEFAULT_PAGE_LIMIT)?;
        let review_limit = parse_positive(&lookup, "CONSOLE_REVIEW_LIMIT", DEFAULT_REVIEW_LIMIT)?;
        let reviews_per_page =
            parse_positive(&lookup, "CONSOLE_REVIEWS_PER_PAGE", DEFAULT_REVIEWS_PER_PAGE)?;
        let teardown_ms = parse_or(
            &lookup,
            "CONSOLE_POPUP_TEARDOWN_MS",
            DEFAULT_POPUP_TEARDOWN_MS,
        )?;
        let fail_open = parse_flag(&lookup, "CONSOLE_SESSION_FAIL_OPEN", true)?;
        let timeout_secs: Option<u64> = lookup("CONSOLE_REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_value("CONSOLE_REQUEST_TIMEOUT_SECS", &raw))
            .transpose()?;

        Ok(Self {
            api_url,
            page_limit,
            review_limit,
            reviews_per_page,
            popup_teardown: Duration::from_millis(teardown_ms),
            session: SessionGateConfig {
                fail_open_without_storage: fail_open,
            },
            session_file: lookup("CONSOLE_SESSION_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            request_timeout: timeout_secs.map(Duration::from_secs),
            dedupe_ids: parse_flag(&lookup, "CONSOLE_DEDUPE_IDS", false)?,
            log_json: parse_flag(&lookup, "CONSOLE_LOG_JSON", false)?,
            sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
        })
    }
}

fn default_api_url() -> Url {
    // The literal is a valid absolute URL.
    Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!("default API URL is valid"))
}

/// Parse the backend URL, forcing a trailing slash so `Url::join` keeps the path.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| ConfigError::InvalidEnvVar("CONSOLE_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "CONSOLE_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_positive<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value == T::default() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{v}'"),
        )),
    }
}
