//! Typed facades over the MemoryRelay endpoints.
//!
//! Request construction and local validation live next to each facade and
//! are shared with [`crate::blocking`], so both clients send byte-identical
//! requests for the same call.

pub mod agents;
pub mod entities;
pub mod memories;

pub use agents::{AgentUpdate, Agents, ListAgents, NewAgent};
pub use entities::{Entities, ListEntities, NewEntity};
pub use memories::{ListMemories, Memories, MemoryUpdate, NewMemory, SearchQuery};
