//! Entity operations and entity-memory links.

use crate::{
    metadata::RequestMetadata,
    types::Entity,
    validation::validate_id,
    Client, Result,
};
use http::Method;
use serde::Serialize;
use serde_json::{json, Value};

/// An entity to create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEntity {
    pub entity_type: String,
    pub entity_value: String,
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NewEntity {
    pub fn new(
        entity_type: impl Into<String>,
        entity_value: impl Into<String>,
        agent_id: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_value: entity_value.into(),
            agent_id: agent_id.into(),
            metadata: None,
        }
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Filters and paging for listing entities.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntities {
    pub agent_id: Option<String>,
    pub entity_type: Option<String>,
    /// Defaults to 100.
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListEntities {
    fn default() -> Self {
        Self {
            agent_id: None,
            entity_type: None,
            limit: 100,
            offset: 0,
        }
    }
}

impl ListEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
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

pub(crate) fn create_request(entity: &NewEntity) -> Result<RequestMetadata> {
    RequestMetadata::new(Method::POST, "/v1/entities").with_json(entity)
}

pub(crate) fn get_request(entity_id: &str) -> Result<RequestMetadata> {
    validate_id("entity_id", entity_id)?;
    Ok(RequestMetadata::new(Method::GET, "/v1/entities").segment(entity_id))
}

pub(crate) fn list_request(params: &ListEntities) -> RequestMetadata {
    RequestMetadata::new(Method::GET, "/v1/entities")
        .with_query_param("limit", params.limit)
        .with_query_param("offset", params.offset)
        .with_optional_query_param("agent_id", params.agent_id.as_deref())
        .with_optional_query_param("entity_type", params.entity_type.as_deref())
}

pub(crate) fn delete_request(entity_id: &str) -> Result<RequestMetadata> {
    validate_id("entity_id", entity_id)?;
    Ok(RequestMetadata::new(Method::DELETE, "/v1/entities").segment(entity_id))
}

pub(crate) fn link_request(entity_id: &str, memory_id: &str) -> Result<RequestMetadata> {
    validate_id("entity_id", entity_id)?;
    validate_id("memory_id", memory_id)?;
    RequestMetadata::new(Method::POST, "/v1/entities")
        .segment(entity_id)
        .segment("link")
        .with_json(&json!({ "memory_id": memory_id }))
}

pub(crate) fn unlink_request(entity_id: &str, memory_id: &str) -> Result<RequestMetadata> {
    validate_id("entity_id", entity_id)?;
    validate_id("memory_id", memory_id)?;
    Ok(RequestMetadata::new(Method::DELETE, "/v1/entities")
        .segment(entity_id)
        .segment("link")
        .segment(memory_id))
}

/// Entity operations on the async [`Client`]. Obtained from
/// [`Client::entities`].
#[derive(Debug, Clone, Copy)]
pub struct Entities<'a> {
    client: &'a Client,
}

impl<'a> Entities<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn create(&self, entity: NewEntity) -> Result<Entity> {
        let request = create_request(&entity)?;
        self.client.execute(request).await?.decode()
    }

    pub async fn get(&self, entity_id: &str) -> Result<Entity> {
        self.client.execute(get_request(entity_id)?).await?.decode()
    }

    pub async fn list(&self, params: ListEntities) -> Result<Vec<Entity>> {
        self.client.execute(list_request(&params)).await?.decode_data()
    }

    pub async fn delete(&self, entity_id: &str) -> Result<()> {
        self.client.execute(delete_request(entity_id)?).await?;
        Ok(())
    }

    /// Links an entity to a memory.
    pub async fn link(&self, entity_id: &str, memory_id: &str) -> Result<()> {
        self.client
            .execute(link_request(entity_id, memory_id)?)
            .await?;
        Ok(())
    }

    pub async fn unlink(&self, entity_id: &str, memory_id: &str) -> Result<()> {
        self.client
            .execute(unlink_request(entity_id, memory_id)?)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body() {
        let request =
            create_request(&NewEntity::new("person", "Ada Lovelace", "agent-1")).unwrap();

        assert_eq!(
            request.body,
            Some(json!({
                "entity_type": "person",
                "entity_value": "Ada Lovelace",
                "agent_id": "agent-1"
            }))
        );
    }

    #[test]
    fn test_link_paths() {
        let link = link_request("ent_1", "mem_1").unwrap();
        assert_eq!(link.method, Method::POST);
        assert_eq!(link.path(), "/v1/entities/ent_1/link");
        assert_eq!(link.body, Some(json!({"memory_id": "mem_1"})));

        let unlink = unlink_request("ent_1", "mem_1").unwrap();
        assert_eq!(unlink.method, Method::DELETE);
        assert_eq!(unlink.path(), "/v1/entities/ent_1/link/mem_1");
    }

    #[test]
    fn test_list_only_sends_set_filters() {
        let request = list_request(&ListEntities::new().entity_type("person"));

        assert_eq!(
            request.query_params,
            vec![
                ("limit".to_string(), "100".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("entity_type".to_string(), "person".to_string()),
            ]
        );
    }
}
