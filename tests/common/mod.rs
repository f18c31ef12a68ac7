//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use memoryrelay::Client;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::MockServer;

pub const API_KEY: &str = "mem_test_key";

/// An async client pointed at `server`, with millisecond backoff.
pub fn client(server: &MockServer) -> Client {
    Client::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .backoff_base(Duration::from_millis(10))
        .build()
        .unwrap()
}

pub fn memory_json(id: &str, content: &str, agent_id: &str) -> Value {
    json!({
        "id": id,
        "content": content,
        "agent_id": agent_id,
        "user_id": null,
        "metadata": {},
        "embedding": [0.1, 0.2, 0.3],
        "created_at": "2026-02-19T20:00:00Z",
        "updated_at": "2026-02-19T20:00:00Z"
    })
}

pub fn entity_json(id: &str, entity_type: &str, entity_value: &str) -> Value {
    json!({
        "id": id,
        "agent_id": "agent-1",
        "entity_type": entity_type,
        "entity_value": entity_value,
        "metadata": null,
        "created_at": "2026-02-19T20:00:00Z",
        "updated_at": "2026-02-19T20:00:00Z"
    })
}

pub fn agent_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "metadata": {},
        "created_at": "2026-02-19T20:00:00Z",
        "updated_at": "2026-02-19T20:00:00Z"
    })
}

pub fn status_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "created_at": "2026-02-19T20:00:00Z",
        "updated_at": "2026-02-19T20:00:01Z"
    })
}
