//! A blocking MemoryRelay client.
//!
//! Same configuration, requests, error mapping, retry policy and polling as
//! the async [`crate::Client`], driven on the calling thread with
//! `reqwest::blocking` and `std::thread::sleep`.
//!
//! Do not create or use a blocking client from inside an async runtime; use
//! the async client there, or move the work onto
//! `tokio::task::spawn_blocking`.
//!
//! # Examples
//!
//! ```no_run
//! use memoryrelay::{blocking::Client, NewMemory};
//!
//! # fn example() -> Result<(), memoryrelay::Error> {
//! let client = Client::new("mem_live_key")?;
//! let memory = client
//!     .memories()
//!     .create(NewMemory::new("User prefers dark mode", "my-agent"))?;
//! println!("created {}", memory.id);
//! # Ok(())
//! # }
//! ```

mod resources;

pub use resources::{Agents, Entities, Memories};

use crate::{
    config::ClientConfig,
    metadata::RequestMetadata,
    pipeline::Pipeline,
    retry::{RetryState, RetryStep},
    types::HealthStatus,
    ClientBuilder, Error, Response, Result,
};
use http::Method;
use std::sync::Arc;
use std::time::Duration;

/// A blocking client for the MemoryRelay API.
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::blocking::Client,
    pipeline: Pipeline,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::Client")
            .field("base_url", &self.base_url())
            .field("timeout", &self.timeout())
            .field("max_retries", &self.max_retries())
            .finish()
    }
}

impl Client {
    /// Same builder as the async client; finish with
    /// [`ClientBuilder::build_blocking`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build_blocking()
    }

    pub(crate) fn from_config(config: ClientConfig) -> Result<Self> {
        let pipeline = Pipeline::new(&config)?;
        let http_client = reqwest::blocking::Client::builder()
            .default_headers(config.headers()?)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::validation(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                pipeline,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.pipeline.base_url()
    }

    pub fn timeout(&self) -> Duration {
        self.inner.pipeline.timeout()
    }

    pub fn max_retries(&self) -> usize {
        self.inner.pipeline.retry_policy().max_attempts
    }

    pub fn memories(&self) -> Memories<'_> {
        Memories::new(self)
    }

    pub fn entities(&self) -> Entities<'_> {
        Entities::new(self)
    }

    pub fn agents(&self) -> Agents<'_> {
        Agents::new(self)
    }

    pub fn health(&self) -> Result<HealthStatus> {
        self.execute(RequestMetadata::new(Method::GET, "/v1/health"))?
            .decode()
    }

    /// Executes one logical call, blocking the thread through retries.
    pub fn execute(&self, request: RequestMetadata) -> Result<Response> {
        let mut state = self.inner.pipeline.retry_policy().start();

        loop {
            let result = self.send_once(&request, &state);
            match state.next(result, &request) {
                RetryStep::Done(result) => return result,
                RetryStep::Retry(delay) => std::thread::sleep(delay),
            }
        }
    }

    fn send_once(&self, request: &RequestMetadata, state: &RetryState<'_>) -> Result<Response> {
        let pipeline = &self.inner.pipeline;
        let url = pipeline.prepare(request, state)?;

        let mut builder = self
            .inner
            .http_client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| pipeline.transport_error(&e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().map_err(|e| pipeline.transport_error(&e))?;

        pipeline.complete(status, headers, body, state)
    }

    pub fn close(self) {
        tracing::debug!(base_url = %self.base_url(), "Closing MemoryRelay client");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shares_builder_settings() {
        let client = Client::builder()
            .api_key("mem_test")
            .base_url("http://localhost:8000/")
            .max_retries(5)
            .build_blocking()
            .unwrap();

        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.max_retries(), 5);
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_blank_api_key_rejected() {
        assert!(Client::new("").is_err());
    }
}
