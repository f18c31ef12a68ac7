//! Client configuration.
//!
//! Everything is fixed at construction time: the API key, base URL, per-call
//! timeout and retry policy. [`ClientConfig`] is what both the async and the
//! blocking client are built from; most code reaches it through
//! [`ClientBuilder`](crate::ClientBuilder).

use crate::{retry::RetryPolicy, Error, Result};
use http::{header, HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.memoryrelay.net";

/// Per-call timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts per logical call used when none is configured.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

pub const ENV_API_KEY: &str = "MEMORYRELAY_API_KEY";
pub const ENV_BASE_URL: &str = "MEMORYRELAY_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MEMORYRELAY_TIMEOUT_SECS";
pub const ENV_MAX_RETRIES: &str = "MEMORYRELAY_MAX_RETRIES";

const USER_AGENT: &str = concat!("memoryrelay-rust/", env!("CARGO_PKG_VERSION"));

/// Settings shared by [`Client`](crate::Client) and
/// [`blocking::Client`](crate::blocking::Client).
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Sent on every request, after the API key and user agent.
    pub default_headers: HeaderMap,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy {
                max_attempts: DEFAULT_MAX_RETRIES,
                ..RetryPolicy::default()
            },
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Default settings with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Loads settings from the environment.
    ///
    /// Required: `MEMORYRELAY_API_KEY`
    /// Optional: `MEMORYRELAY_BASE_URL`, `MEMORYRELAY_TIMEOUT_SECS`,
    /// `MEMORYRELAY_MAX_RETRIES`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::validation(format!("{} not set", ENV_API_KEY)))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout = timeout
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|secs| *secs > 0.0)
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .ok_or_else(|| {
                    Error::validation(format!(
                        "{} must be a positive number, got {:?}",
                        ENV_TIMEOUT_SECS, timeout
                    ))
                })?;
        }
        if let Some(max_retries) = lookup(ENV_MAX_RETRIES) {
            config.retry.max_attempts = max_retries.trim().parse().map_err(|_| {
                Error::validation(format!(
                    "{} must be an integer, got {:?}",
                    ENV_MAX_RETRIES, max_retries
                ))
            })?;
        }

        Ok(config)
    }

    /// Validates the base URL and returns it with trailing slashes removed,
    /// together with its parsed form.
    pub(crate) fn normalized_base_url(&self) -> Result<(String, Url)> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        let url = Url::parse(&trimmed).map_err(|e| {
            Error::validation(format!("Invalid base URL {:?}: {}", self.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(Error::validation(format!(
                "Base URL must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }

        Ok((trimmed, url))
    }

    /// The headers sent on every request.
    pub(crate) fn headers(&self) -> Result<HeaderMap> {
        if self.api_key.trim().is_empty() {
            return Err(Error::validation("api_key cannot be empty"));
        }

        let mut api_key = HeaderValue::try_from(self.api_key.as_str())
            .map_err(|_| Error::validation("api_key contains characters not allowed in a header"))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        for (name, value) in &self.default_headers {
            headers.insert(name.clone(), value.clone());
        }

        Ok(headers)
    }
}
