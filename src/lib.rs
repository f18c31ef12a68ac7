//! # MemoryRelay - client for the MemoryRelay memory API
//!
//! MemoryRelay stores content items ("memories") for AI agents, embeds them,
//! and searches them semantically. This crate is a typed client for its HTTP
//! API, built on `reqwest`, with automatic retries, a closed error taxonomy,
//! structured logging, and polling for the v2 asynchronous create workflow.
//!
//! ## Quick Start
//!
//! ```no_run
//! use memoryrelay::{Client, NewMemory, SearchQuery};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), memoryrelay::Error> {
//!     let client = Client::new("mem_live_key")?;
//!
//!     let memory = client
//!         .memories()
//!         .create(
//!             NewMemory::new("User prefers dark mode", "my-agent")
//!                 .metadata(json!({"category": "preference"})),
//!         )
//!         .await?;
//!     println!("Created memory {}", memory.id);
//!
//!     let hits = client
//!         .memories()
//!         .search(SearchQuery::new("user preferences").agent_id("my-agent").limit(5))
//!         .await?;
//!     for hit in hits {
//!         println!("{:.2} {}", hit.score, hit.memory.content);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed resources** - memories, entities and agents, with request validation before anything is sent
//! - **Automatic retries** - exponential backoff for 429, 5xx and transport failures, honoring `Retry-After`
//! - **Closed error taxonomy** - every failure is one [`Error`] variant with a matching [`ErrorKind`]
//! - **v2 async jobs** - queue a memory, then poll until its embedding is ready
//! - **Async and blocking** - [`Client`] for tokio, [`blocking::Client`] for synchronous code, identical behavior
//! - **Structured logging** - attempts, retries and polls are reported through `tracing`
//!
//! ## Error Handling
//!
//! ```no_run
//! use memoryrelay::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::new("mem_live_key")?;
//! match client.memories().get("mem_123").await {
//!     Ok(memory) => println!("{}", memory.content),
//!     Err(Error::NotFound { .. }) => println!("no such memory"),
//!     Err(Error::RateLimited { retry_after, .. }) => {
//!         println!("still throttled after retries; server asked for {:?}", retry_after);
//!     }
//!     Err(e) => eprintln!("{} ({:?})", e, e.kind()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Waiting for Async Memories
//!
//! ```no_run
//! use memoryrelay::{Client, NewMemory, PollOptions};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), memoryrelay::Error> {
//! # let client = Client::new("mem_live_key")?;
//! let memory = client
//!     .memories()
//!     .create_and_wait(
//!         NewMemory::new("Meeting notes from Monday", "my-agent"),
//!         PollOptions::default().timeout(Duration::from_secs(60)),
//!     )
//!     .await?;
//! assert!(memory.embedding.is_some());
//! # Ok(())
//! # }
//! ```

pub mod blocking;
mod client;
pub mod config;
mod error;
pub mod metadata;
mod pipeline;
pub mod poller;
pub mod rate_limit;
pub mod resources;
mod response;
pub mod retry;
pub mod types;
pub mod validation;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use poller::PollOptions;
pub use resources::{
    AgentUpdate, ListAgents, ListEntities, ListMemories, MemoryUpdate, NewAgent, NewEntity,
    NewMemory, SearchQuery,
};
pub use response::{Outcome, Response};
pub use retry::RetryPolicy;
pub use types::{
    Agent, BatchItemStatus, BatchMemoryItem, BatchMemoryResponse, BatchMemoryResult, Entity,
    HealthStatus, JobStatus, Memory, MemoryAsyncResponse, MemorySearchResult,
    MemoryStatusResponse,
};
