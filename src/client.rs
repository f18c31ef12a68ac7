//! The async MemoryRelay client.
//!
//! [`Client`] is the main entry point. Use [`ClientBuilder`] to configure it,
//! then reach the API through the resource facades:
//! [`memories`](Client::memories), [`entities`](Client::entities) and
//! [`agents`](Client::agents).

use crate::{
    blocking,
    config::ClientConfig,
    metadata::RequestMetadata,
    pipeline::Pipeline,
    resources::{Agents, Entities, Memories},
    retry::{RetryState, RetryStep},
    types::HealthStatus,
    Error, Response, Result,
};
use http::{HeaderName, HeaderValue, Method};
use std::sync::Arc;
use std::time::Duration;

/// An async client for the MemoryRelay API.
///
/// Cloning is cheap and clones share one connection pool, so a single client
/// can serve many concurrent tasks. Each logical call gets its own retry
/// state; nothing about one call's retries leaks into another.
///
/// # Examples
///
/// ```no_run
/// use memoryrelay::{Client, NewMemory, SearchQuery};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), memoryrelay::Error> {
/// let client = Client::builder()
///     .api_key("mem_live_key")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// client
///     .memories()
///     .create(NewMemory::new("User prefers dark mode", "my-agent"))
///     .await?;
///
/// for hit in client.memories().search(SearchQuery::new("preferences")).await? {
///     println!("{:.2} {}", hit.score, hit.memory.content);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    pipeline: Pipeline,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("timeout", &self.timeout())
            .field("max_retries", &self.max_retries())
            .finish()
    }
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with default settings for `api_key`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    pub(crate) fn from_config(config: ClientConfig) -> Result<Self> {
        let pipeline = Pipeline::new(&config)?;
        let http_client = reqwest::Client::builder()
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

    /// The base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.inner.pipeline.base_url()
    }

    /// The per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.pipeline.timeout()
    }

    /// Total attempts per logical call, including the first.
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

    /// Reads `GET /v1/health`.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.execute(RequestMetadata::new(Method::GET, "/v1/health"))
            .await?
            .decode()
    }

    /// Executes one logical call: attempts, classification, and retries.
    ///
    /// The facades build on this; it is public for endpoints they do not
    /// cover yet.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use memoryrelay::{Client, metadata::RequestMetadata};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), memoryrelay::Error> {
    /// let client = Client::new("mem_live_key")?;
    /// let response = client
    ///     .execute(RequestMetadata::new(Method::GET, "/v1/health"))
    ///     .await?;
    /// println!("{} after {} attempt(s)", response.status, response.attempts);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(&self, request: RequestMetadata) -> Result<Response> {
        let mut state = self.inner.pipeline.retry_policy().start();

        loop {
            let result = self.send_once(&request, &state).await;
            match state.next(result, &request) {
                RetryStep::Done(result) => return result,
                RetryStep::Retry(delay) => tokio::time::sleep(delay).await,
            }
        }
    }

    /// Executes a single attempt.
    async fn send_once(
        &self,
        request: &RequestMetadata,
        state: &RetryState<'_>,
    ) -> Result<Response> {
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

        let response = builder
            .send()
            .await
            .map_err(|e| pipeline.transport_error(&e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| pipeline.transport_error(&e))?;

        pipeline.complete(status, headers, body, state)
    }

    /// Releases this handle. The connection pool closes once every clone has
    /// been dropped.
    pub fn close(self) {
        tracing::debug!(base_url = %self.base_url(), "Closing MemoryRelay client");
    }
}

/// Builder for configuring and creating a [`Client`] or a
/// [`blocking::Client`].
///
/// # Examples
///
/// ```no_run
/// use memoryrelay::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), memoryrelay::Error> {
/// let client = ClientBuilder::new()
///     .api_key("mem_live_key")
///     .base_url("https://memoryrelay.internal.example.com/")
///     .timeout(Duration::from_secs(10))
///     .max_retries(5)
///     .default_header("X-Tenant", "acme")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings and no API key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an explicit configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Starts from the `MEMORYRELAY_*` environment variables; see
    /// [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(ClientConfig::from_env()?))
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Sets the base URL. Trailing slashes are dropped when the client is
    /// built.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Sets the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the total attempts per call, including the first.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.config.retry.max_attempts = max_retries;
        self
    }

    /// Sets the wait after the first failed attempt; later waits double.
    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.config.retry.base_delay = base;
        self
    }

    /// Caps every wait, including waits requested by `Retry-After`.
    pub fn max_backoff(mut self, max: Duration) -> Self {
        self.config.retry.max_delay = max;
        self
    }

    pub fn jitter(mut self, jitter: bool) -> Self {
        self.config.retry.jitter = jitter;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::validation(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::validation(format!("Invalid header value: {}", e)))?;
        self.config.default_headers.insert(name, value);
        Ok(self)
    }

    /// Builds the async [`Client`].
    ///
    /// # Errors
    ///
    /// Returns a validation error if the API key is blank or the base URL is
    /// not an http(s) URL.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }

    /// Builds a [`blocking::Client`] with the same settings.
    ///
    /// Must not be called from inside an async runtime.
    pub fn build_blocking(self) -> Result<blocking::Client> {
        blocking::Client::from_config(self.config)
    }
}
