//! Memory operations: CRUD, semantic search, batch create, and the v2
//! asynchronous create-then-poll workflow.

use crate::{
    metadata::RequestMetadata,
    poller::{PollOptions, PollState, PollStep},
    types::{
        BatchMemoryItem, BatchMemoryResponse, Memory, MemoryAsyncResponse, MemorySearchResult,
        MemoryStatusResponse,
    },
    validation::{validate_agent_id, validate_batch, validate_content, validate_id},
    Client, Result,
};
use http::Method;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

/// A memory to create.
///
/// # Examples
///
/// ```
/// use memoryrelay::NewMemory;
/// use serde_json::json;
///
/// let memory = NewMemory::new("User prefers dark mode", "my-agent")
///     .metadata(json!({"category": "preference"}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMemory {
    pub content: String,
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl NewMemory {
    pub fn new(content: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            agent_id: agent_id.into(),
            metadata: None,
            user_id: None,
        }
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Fields to change on an existing memory. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl MemoryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Filters and paging for listing memories.
#[derive(Debug, Clone, PartialEq)]
pub struct ListMemories {
    pub agent_id: Option<String>,
    pub user_id: Option<String>,
    /// Defaults to 100.
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListMemories {
    fn default() -> Self {
        Self {
            agent_id: None,
            user_id: None,
            limit: 100,
            offset: 0,
        }
    }
}

impl ListMemories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// A semantic search.
///
/// Results come back in the server's ranking; nothing is re-ordered or
/// filtered locally.
///
/// # Examples
///
/// ```
/// use memoryrelay::SearchQuery;
///
/// let query = SearchQuery::new("user preferences")
///     .agent_id("my-agent")
///     .limit(5)
///     .min_score(0.7);
/// assert_eq!(query.limit, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Defaults to 10.
    pub limit: u32,
    /// Minimum similarity score in `[0, 1]`; defaults to 0.0.
    pub min_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_filter: Option<Value>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            agent_id: None,
            user_id: None,
            limit: 10,
            min_score: 0.0,
            metadata_filter: None,
        }
    }

    pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn metadata_filter(mut self, filter: Value) -> Self {
        self.metadata_filter = Some(filter);
        self
    }
}

fn validate_new(memory: &NewMemory) -> Result<()> {
    validate_content(&memory.content)?;
    validate_agent_id(&memory.agent_id)
}

pub(crate) fn create_request(memory: &NewMemory) -> Result<RequestMetadata> {
    validate_new(memory)?;
    RequestMetadata::new(Method::POST, "/v1/memories").with_json(memory)
}

pub(crate) fn create_async_request(memory: &NewMemory) -> Result<RequestMetadata> {
    validate_new(memory)?;
    RequestMetadata::new(Method::POST, "/v2/memories").with_json(memory)
}

pub(crate) fn get_request(memory_id: &str) -> Result<RequestMetadata> {
    validate_id("memory_id", memory_id)?;
    Ok(RequestMetadata::new(Method::GET, "/v1/memories").segment(memory_id))
}

pub(crate) fn update_request(memory_id: &str, update: &MemoryUpdate) -> Result<RequestMetadata> {
    validate_id("memory_id", memory_id)?;
    if let Some(content) = &update.content {
        validate_content(content)?;
    }
    RequestMetadata::new(Method::PUT, "/v1/memories")
        .segment(memory_id)
        .with_json(update)
}

pub(crate) fn delete_request(memory_id: &str) -> Result<RequestMetadata> {
    validate_id("memory_id", memory_id)?;
    Ok(RequestMetadata::new(Method::DELETE, "/v1/memories").segment(memory_id))
}

pub(crate) fn list_request(params: &ListMemories) -> RequestMetadata {
    RequestMetadata::new(Method::GET, "/v1/memories")
        .with_query_param("limit", params.limit)
        .with_query_param("offset", params.offset)
        .with_optional_query_param("agent_id", params.agent_id.as_deref())
        .with_optional_query_param("user_id", params.user_id.as_deref())
}

pub(crate) fn search_request(query: &SearchQuery) -> Result<RequestMetadata> {
    RequestMetadata::new(Method::POST, "/v1/memories/search").with_json(query)
}

pub(crate) fn batch_request(
    items: &[BatchMemoryItem],
    parallel_embeddings: bool,
) -> Result<RequestMetadata> {
    validate_batch(items)?;
    RequestMetadata::new(Method::POST, "/v1/memories/batch").with_json(&json!({
        "memories": items,
        "parallel_embeddings": parallel_embeddings,
    }))
}

pub(crate) fn status_request(memory_id: &str) -> Result<RequestMetadata> {
    validate_id("memory_id", memory_id)?;
    Ok(RequestMetadata::new(Method::GET, "/v2/memories")
        .segment(memory_id)
        .segment("status"))
}

/// Memory operations on the async [`Client`]. Obtained from
/// [`Client::memories`].
#[derive(Debug, Clone, Copy)]
pub struct Memories<'a> {
    client: &'a Client,
}

impl<'a> Memories<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Creates a memory and waits for the server to embed it (v1).
    ///
    /// # Errors
    ///
    /// Fails with a validation error, without a request, if the content is
    /// blank or longer than 50,000 characters, or the agent id is blank.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use memoryrelay::{Client, NewMemory};
    ///
    /// # async fn example() -> Result<(), memoryrelay::Error> {
    /// let client = Client::new("mem_live_key")?;
    /// let memory = client
    ///     .memories()
    ///     .create(NewMemory::new("User prefers dark mode", "my-agent"))
    ///     .await?;
    /// println!("created {}", memory.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, memory: NewMemory) -> Result<Memory> {
        let request = create_request(&memory)?;
        self.client.execute(request).await?.decode()
    }

    pub async fn get(&self, memory_id: &str) -> Result<Memory> {
        self.client.execute(get_request(memory_id)?).await?.decode()
    }

    /// Updates content and/or metadata. New content is validated like
    /// [`create`](Self::create).
    pub async fn update(&self, memory_id: &str, update: MemoryUpdate) -> Result<Memory> {
        let request = update_request(memory_id, &update)?;
        self.client.execute(request).await?.decode()
    }

    pub async fn delete(&self, memory_id: &str) -> Result<()> {
        self.client.execute(delete_request(memory_id)?).await?;
        Ok(())
    }

    pub async fn list(&self, params: ListMemories) -> Result<Vec<Memory>> {
        self.client.execute(list_request(&params)).await?.decode_data()
    }

    pub async fn search(&self, query: SearchQuery) -> Result<Vec<MemorySearchResult>> {
        let request = search_request(&query)?;
        self.client.execute(request).await?.decode_data()
    }

    /// Creates many memories in one request.
    ///
    /// Every item is validated first; one invalid item rejects the whole
    /// batch and nothing is sent.
    pub async fn create_batch(
        &self,
        items: Vec<BatchMemoryItem>,
        parallel_embeddings: bool,
    ) -> Result<BatchMemoryResponse> {
        let request = batch_request(&items, parallel_embeddings)?;
        self.client.execute(request).await?.decode()
    }

    /// Queues a memory for creation (v2) and returns immediately with the
    /// job handle; the memory starts out `pending`.
    pub async fn create_async(&self, memory: NewMemory) -> Result<MemoryAsyncResponse> {
        let request = create_async_request(&memory)?;
        self.client.execute(request).await?.decode()
    }

    /// Reads the current job status once.
    pub async fn get_status(&self, memory_id: &str) -> Result<MemoryStatusResponse> {
        self.client.execute(status_request(memory_id)?).await?.decode()
    }

    /// Polls until the memory is ready, then fetches it.
    ///
    /// # Errors
    ///
    /// A validation error if embedding generation failed, a timeout error if
    /// `options.timeout` passed first, or any error from the status and get
    /// calls themselves.
    pub async fn wait_for_ready(&self, memory_id: &str, options: PollOptions) -> Result<Memory> {
        self.poll_until_ready(memory_id, PollState::new(options)).await
    }

    /// [`create_async`](Self::create_async) followed by
    /// [`wait_for_ready`](Self::wait_for_ready), both within `options.timeout`.
    pub async fn create_and_wait(&self, memory: NewMemory, options: PollOptions) -> Result<Memory> {
        let started = Instant::now();
        let queued = self.create_async(memory).await?;
        self.poll_until_ready(&queued.id, PollState::starting_at(options, started))
            .await
    }

    async fn poll_until_ready(&self, memory_id: &str, mut state: PollState) -> Result<Memory> {
        loop {
            let status = self.get_status(memory_id).await?;
            match state.observe(memory_id, &status.status, status.error.as_deref()) {
                PollStep::Fetch => return self.get(memory_id).await,
                PollStep::Wait(delay) => tokio::time::sleep(delay).await,
                PollStep::Fail(err) => return Err(err),
            }
        }
    }
}
