//! Agent operations.

use crate::{metadata::RequestMetadata, types::Agent, validation::validate_id, Client, Result};
use http::Method;
use serde::Serialize;
use serde_json::Value;

/// An agent to create, under a caller-chosen id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAgent {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NewAgent {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            metadata: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Fields to change on an existing agent. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl AgentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Paging for listing agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListAgents {
    /// Defaults to 100.
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListAgents {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

impl ListAgents {
    pub fn new() -> Self {
        Self::default()
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

pub(crate) fn create_request(agent: &NewAgent) -> Result<RequestMetadata> {
    validate_id("agent id", &agent.id)?;
    RequestMetadata::new(Method::POST, "/v1/agents").with_json(agent)
}

pub(crate) fn get_request(agent_id: &str) -> Result<RequestMetadata> {
    validate_id("agent_id", agent_id)?;
    Ok(RequestMetadata::new(Method::GET, "/v1/agents").segment(agent_id))
}

pub(crate) fn update_request(agent_id: &str, update: &AgentUpdate) -> Result<RequestMetadata> {
    validate_id("agent_id", agent_id)?;
    RequestMetadata::new(Method::PUT, "/v1/agents")
        .segment(agent_id)
        .with_json(update)
}

pub(crate) fn delete_request(agent_id: &str) -> Result<RequestMetadata> {
    validate_id("agent_id", agent_id)?;
    Ok(RequestMetadata::new(Method::DELETE, "/v1/agents").segment(agent_id))
}

pub(crate) fn list_request(params: &ListAgents) -> RequestMetadata {
    RequestMetadata::new(Method::GET, "/v1/agents")
        .with_query_param("limit", params.limit)
        .with_query_param("offset", params.offset)
}

/// Agent operations on the async [`Client`]. Obtained from
/// [`Client::agents`].
#[derive(Debug, Clone, Copy)]
pub struct Agents<'a> {
    client: &'a Client,
}

impl<'a> Agents<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn create(&self, agent: NewAgent) -> Result<Agent> {
        let request = create_request(&agent)?;
        self.client.execute(request).await?.decode()
    }

    pub async fn get(&self, agent_id: &str) -> Result<Agent> {
        self.client.execute(get_request(agent_id)?).await?.decode()
    }

    pub async fn update(&self, agent_id: &str, update: AgentUpdate) -> Result<Agent> {
        let request = update_request(agent_id, &update)?;
        self.client.execute(request).await?.decode()
    }

    /// Deletes an agent. The server also removes the agent's memories and
    /// entities.
    pub async fn delete(&self, agent_id: &str) -> Result<()> {
        self.client.execute(delete_request(agent_id)?).await?;
        Ok(())
    }

    pub async fn list(&self, params: ListAgents) -> Result<Vec<Agent>> {
        self.client.execute(list_request(&params)).await?.decode_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_body_uses_id_field() {
        let request = create_request(&NewAgent::new("support-bot").name("Support")).unwrap();

        assert_eq!(request.path(), "/v1/agents");
        assert_eq!(
            request.body,
            Some(json!({"id": "support-bot", "name": "Support"}))
        );
    }

    #[test]
    fn test_update_sends_only_changes() {
        let request =
            update_request("support-bot", &AgentUpdate::new().description("Tier 1")).unwrap();

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path(), "/v1/agents/support-bot");
        assert_eq!(request.body, Some(json!({"description": "Tier 1"})));
    }

    #[test]
    fn test_list_paging() {
        let request = list_request(&ListAgents::new().limit(20).offset(40));
        assert_eq!(
            request.query_params,
            vec![
                ("limit".to_string(), "20".to_string()),
                ("offset".to_string(), "40".to_string()),
            ]
        );
    }
}
