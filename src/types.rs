//! Data model returned by the MemoryRelay API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A stored content item with its embedding, owned by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub content: String,
    pub agent_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    /// Absent until embedding generation has finished.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One search hit, in the order the server ranked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySearchResult {
    pub memory: Memory,
    /// Similarity score in `[0, 1]`.
    pub score: f32,
    #[serde(default)]
    pub distance: Option<f32>,
}

/// A named object (person, organization, project, ...) tracked per agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub agent_id: String,
    pub entity_type: String,
    pub entity_value: String,
    #[serde(default)]
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A namespace under which memories and entities are grouped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Service status from `GET /v1/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub api_version: String,
    pub environment: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub uptime_seconds: u64,
    /// Per-dependency status, e.g. `"database" => "up"`.
    #[serde(default)]
    pub services: HashMap<String, String>,
}

/// One memory in a batch create.
///
/// `content` is required and limited to 50,000 characters; it is checked
/// before the batch is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMemoryItem {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Caller-chosen correlation id, echoed back in the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl BatchMemoryItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: None,
            agent_id: None,
            user_id: None,
            client_id: None,
        }
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

/// Outcome of one batch item. Anything else the server reports lands in
/// `Unknown`, so one odd item does not fail the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BatchItemStatus {
    Success,
    Failed,
    Skipped,
    Unknown(String),
}

impl From<String> for BatchItemStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "success" => BatchItemStatus::Success,
            "failed" => BatchItemStatus::Failed,
            "skipped" => BatchItemStatus::Skipped,
            _ => BatchItemStatus::Unknown(status),
        }
    }
}

impl From<BatchItemStatus> for String {
    fn from(status: BatchItemStatus) -> Self {
        match status {
            BatchItemStatus::Success => "success".to_string(),
            BatchItemStatus::Failed => "failed".to_string(),
            BatchItemStatus::Skipped => "skipped".to_string(),
            BatchItemStatus::Unknown(status) => status,
        }
    }
}

/// Per-item result of a batch create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMemoryResult {
    pub status: BatchItemStatus,
    #[serde(default)]
    pub memory_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Response of `POST /v1/memories/batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMemoryResponse {
    pub success: bool,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<BatchMemoryResult>,
    /// Server-side timings in milliseconds, e.g. `"total_ms"`.
    #[serde(default)]
    pub timing: HashMap<String, f64>,
}

impl BatchMemoryResponse {
    /// Ids of the memories that were created.
    pub fn created_ids(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|result| result.status == BatchItemStatus::Success)
            .filter_map(|result| result.memory_id.as_deref())
    }
}

/// State of a server-side embedding job.
///
/// `Ready` and `Failed` are terminal. Statuses this client does not know are
/// kept verbatim in `Unknown` and treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Processing,
    Ready,
    Failed,
    Unknown(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Ready | JobStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Ready => "ready",
            JobStatus::Failed => "failed",
            JobStatus::Unknown(status) => status,
        }
    }
}

impl From<String> for JobStatus {
    fn from(status: String) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "pending" => JobStatus::Pending,
            "processing" => JobStatus::Processing,
            "ready" => JobStatus::Ready,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Unknown(status),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Unknown(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immediate response of `POST /v2/memories`: the job was accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryAsyncResponse {
    pub id: String,
    pub status: JobStatus,
    pub job_id: String,
    #[serde(default)]
    pub estimated_completion_seconds: Option<u64>,
}

/// Response of `GET /v2/memories/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStatusResponse {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Failure reason when `status` is `failed`, if the server gave one.
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_status_round_trips_known_and_unknown() {
        let status: JobStatus = serde_json::from_value(json!("processing")).unwrap();
        assert_eq!(status, JobStatus::Processing);
        assert!(!status.is_terminal());

        let status: JobStatus = serde_json::from_value(json!("READY")).unwrap();
        assert_eq!(status, JobStatus::Ready);
        assert!(status.is_terminal());

        let status: JobStatus = serde_json::from_value(json!("queued")).unwrap();
        assert_eq!(status, JobStatus::Unknown("queued".into()));
        assert!(!status.is_terminal());
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("queued"));
    }

    #[test]
    fn test_memory_optional_fields_default() {
        let memory: Memory = serde_json::from_value(json!({
            "id": "mem_1",
            "content": "User prefers dark mode",
            "agent_id": "agent-1",
            "created_at": "2026-02-19T20:00:00Z",
            "updated_at": "2026-02-19T20:00:03Z"
        }))
        .unwrap();

        assert!(memory.user_id.is_none());
        assert!(memory.embedding.is_none());
        assert_eq!(memory.created_at.to_rfc3339(), "2026-02-19T20:00:00+00:00");
    }

    #[test]
    fn test_batch_item_omits_unset_fields() {
        let item = BatchMemoryItem::new("User likes Rust").client_id("c-1");

        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"content": "User likes Rust", "client_id": "c-1"})
        );
    }

    #[test]
    fn test_batch_created_ids() {
        let response: BatchMemoryResponse = serde_json::from_value(json!({
            "success": false,
            "total": 3,
            "succeeded": 1,
            "failed": 1,
            "skipped": 1,
            "results": [
                {"status": "success", "memory_id": "mem_1"},
                {"status": "failed", "error": "embedding failed"},
                {"status": "skipped", "client_id": "dup"}
            ],
            "timing": {"total_ms": 42.0}
        }))
        .unwrap();

        assert_eq!(response.created_ids().collect::<Vec<_>>(), vec!["mem_1"]);
        assert_eq!(response.timing["total_ms"], 42.0);
    }

    #[test]
    fn test_batch_unrecognized_item_status_is_kept() {
        let response: BatchMemoryResponse = serde_json::from_value(json!({
            "success": true,
            "total": 2,
            "succeeded": 1,
            "failed": 0,
            "skipped": 0,
            "results": [
                {"status": "success", "memory_id": "mem_1"},
                {"status": "deduplicated", "memory_id": "mem_0"}
            ]
        }))
        .unwrap();

        assert_eq!(
            response.results[1].status,
            BatchItemStatus::Unknown("deduplicated".into())
        );
        assert_eq!(response.created_ids().collect::<Vec<_>>(), vec!["mem_1"]);
        assert_eq!(
            serde_json::to_value(&response.results[1].status).unwrap(),
            json!("deduplicated")
        );
    }
}
