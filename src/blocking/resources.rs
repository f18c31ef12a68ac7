//! Blocking counterparts of the async resource facades.

use super::Client;
use crate::{
    poller::{PollOptions, PollState, PollStep},
    resources::{
        agents, entities, memories, AgentUpdate, ListAgents, ListEntities, ListMemories,
        MemoryUpdate, NewAgent, NewEntity, NewMemory, SearchQuery,
    },
    types::{
        Agent, BatchMemoryItem, BatchMemoryResponse, Entity, Memory,
        MemoryAsyncResponse, MemorySearchResult, MemoryStatusResponse,
    },
    Result,
};
use std::time::Instant;

/// Memory operations on the blocking [`Client`].
///
/// Method for method the same as [`crate::resources::Memories`].
#[derive(Debug, Clone, Copy)]
pub struct Memories<'a> {
    client: &'a Client,
}

impl<'a> Memories<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn create(&self, memory: NewMemory) -> Result<Memory> {
        self.client
            .execute(memories::create_request(&memory)?)?
            .decode()
    }

    pub fn get(&self, memory_id: &str) -> Result<Memory> {
        self.client.execute(memories::get_request(memory_id)?)?.decode()
    }

    pub fn update(&self, memory_id: &str, update: MemoryUpdate) -> Result<Memory> {
        self.client
            .execute(memories::update_request(memory_id, &update)?)?
            .decode()
    }

    pub fn delete(&self, memory_id: &str) -> Result<()> {
        self.client.execute(memories::delete_request(memory_id)?)?;
        Ok(())
    }

    pub fn list(&self, params: ListMemories) -> Result<Vec<Memory>> {
        self.client
            .execute(memories::list_request(&params))?
            .decode_data()
    }

    pub fn search(&self, query: SearchQuery) -> Result<Vec<MemorySearchResult>> {
        self.client
            .execute(memories::search_request(&query)?)?
            .decode_data()
    }

    pub fn create_batch(
        &self,
        items: Vec<BatchMemoryItem>,
        parallel_embeddings: bool,
    ) -> Result<BatchMemoryResponse> {
        self.client
            .execute(memories::batch_request(&items, parallel_embeddings)?)?
            .decode()
    }

    pub fn create_async(&self, memory: NewMemory) -> Result<MemoryAsyncResponse> {
        self.client
            .execute(memories::create_async_request(&memory)?)?
            .decode()
    }

    pub fn get_status(&self, memory_id: &str) -> Result<MemoryStatusResponse> {
        self.client
            .execute(memories::status_request(memory_id)?)?
            .decode()
    }

    pub fn wait_for_ready(&self, memory_id: &str, options: PollOptions) -> Result<Memory> {
        self.poll_until_ready(memory_id, PollState::new(options))
    }

    pub fn create_and_wait(&self, memory: NewMemory, options: PollOptions) -> Result<Memory> {
        let started = Instant::now();
        let queued = self.create_async(memory)?;
        self.poll_until_ready(&queued.id, PollState::starting_at(options, started))
    }

    fn poll_until_ready(&self, memory_id: &str, mut state: PollState) -> Result<Memory> {
        loop {
            let status = self.get_status(memory_id)?;
            match state.observe(memory_id, &status.status, status.error.as_deref()) {
                PollStep::Fetch => return self.get(memory_id),
                PollStep::Wait(delay) => std::thread::sleep(delay),
                PollStep::Fail(err) => return Err(err),
            }
        }
    }
}

/// Entity operations on the blocking [`Client`].
#[derive(Debug, Clone, Copy)]
pub struct Entities<'a> {
    client: &'a Client,
}

impl<'a> Entities<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn create(&self, entity: NewEntity) -> Result<Entity> {
        self.client
            .execute(entities::create_request(&entity)?)?
            .decode()
    }

    pub fn get(&self, entity_id: &str) -> Result<Entity> {
        self.client.execute(entities::get_request(entity_id)?)?.decode()
    }

    pub fn list(&self, params: ListEntities) -> Result<Vec<Entity>> {
        self.client
            .execute(entities::list_request(&params))?
            .decode_data()
    }

    pub fn delete(&self, entity_id: &str) -> Result<()> {
        self.client.execute(entities::delete_request(entity_id)?)?;
        Ok(())
    }

    pub fn link(&self, entity_id: &str, memory_id: &str) -> Result<()> {
        self.client
            .execute(entities::link_request(entity_id, memory_id)?)?;
        Ok(())
    }

    pub fn unlink(&self, entity_id: &str, memory_id: &str) -> Result<()> {
        self.client
            .execute(entities::unlink_request(entity_id, memory_id)?)?;
        Ok(())
    }
}

/// Agent operations on the blocking [`Client`].
#[derive(Debug, Clone, Copy)]
pub struct Agents<'a> {
    client: &'a Client,
}

impl<'a> Agents<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn create(&self, agent: NewAgent) -> Result<Agent> {
        self.client.execute(agents::create_request(&agent)?)?.decode()
    }

    pub fn get(&self, agent_id: &str) -> Result<Agent> {
        self.client.execute(agents::get_request(agent_id)?)?.decode()
    }

    pub fn update(&self, agent_id: &str, update: AgentUpdate) -> Result<Agent> {
        self.client
            .execute(agents::update_request(agent_id, &update)?)?
            .decode()
    }

    pub fn delete(&self, agent_id: &str) -> Result<()> {
        self.client.execute(agents::delete_request(agent_id)?)?;
        Ok(())
    }

    pub fn list(&self, params: ListAgents) -> Result<Vec<Agent>> {
        self.client
            .execute(agents::list_request(&params))?
            .decode_data()
    }
}
