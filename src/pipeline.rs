//! The request pipeline shared by the async and blocking clients.
//!
//! A logical call is a loop of attempts. Everything about an attempt except
//! the I/O itself lives here: URL resolution, response classification, and
//! the mapping of transport failures onto [`Error`]. The drivers in
//! [`crate::client`] and [`crate::blocking`] only send bytes and sleep.

use crate::{
    config::ClientConfig,
    metadata::RequestMetadata,
    response::{Outcome, Response},
    retry::{RetryPolicy, RetryState},
    Error, Result,
};
use http::{HeaderMap, StatusCode};
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub(crate) struct Pipeline {
    base_url: Url,
    base_url_display: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl Pipeline {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        let (base_url_display, base_url) = config.normalized_base_url()?;

        tracing::debug!(
            base_url = %base_url_display,
            timeout_secs = config.timeout.as_secs_f64(),
            max_attempts = config.retry.max_attempts,
            "Initializing MemoryRelay client"
        );

        Ok(Self {
            base_url,
            base_url_display,
            timeout: config.timeout,
            retry: config.retry.clone(),
        })
    }

    /// The base URL without a trailing slash.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url_display
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Resolves the URL for the current attempt.
    pub(crate) fn prepare(&self, request: &RequestMetadata, state: &RetryState<'_>) -> Result<Url> {
        let url = request.url(&self.base_url)?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            attempt = state.attempts(),
            "Executing HTTP request"
        );

        Ok(url)
    }

    /// Classifies a received response.
    pub(crate) fn complete(
        &self,
        status: StatusCode,
        headers: HeaderMap,
        body: String,
        state: &RetryState<'_>,
    ) -> Result<Response> {
        let latency = state.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            attempts = state.attempts(),
            "Received HTTP response"
        );

        if !status.is_success() {
            if status.is_client_error() {
                tracing::error!(status = status.as_u16(), response = %body, "Client error (4xx)");
            } else if status.is_server_error() {
                tracing::warn!(status = status.as_u16(), response = %body, "Server error (5xx)");
            } else {
                tracing::warn!(status = status.as_u16(), response = %body, "Unexpected status");
            }
            return Err(Error::from_response(status, &headers, &body));
        }

        let outcome = Outcome::from_body(status, &body)?;
        Ok(Response::new(
            outcome,
            status,
            headers,
            latency,
            state.attempts(),
        ))
    }

    /// Maps a transport failure onto the error taxonomy.
    pub(crate) fn transport_error(&self, err: &reqwest::Error) -> Error {
        Error::from_transport(err, Some(self.timeout))
    }
}
