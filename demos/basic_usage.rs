//! Basic example: store, search, and manage memories.
//!
//! This example shows how to:
//! - Build a client from `MEMORYRELAY_API_KEY` and friends
//! - Create an agent and store memories under it
//! - Run a semantic search
//! - Track an entity and link it to a memory
//! - Branch on error kinds
//!
//! Run with: `MEMORYRELAY_API_KEY=mem_... cargo run --example basic_usage`

use memoryrelay::{
    ClientBuilder, Error, ListMemories, MemoryUpdate, NewAgent, NewEntity, NewMemory, SearchQuery,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("memoryrelay=debug,basic_usage=info")
        .init();

    let client = ClientBuilder::from_env()?.build()?;

    let health = client.health().await?;
    println!("API {} ({}), status {}", health.version, health.environment, health.status);

    println!("=== Agent ===");
    let agent = match client
        .agents()
        .create(NewAgent::new("demo-agent").name("Demo Agent"))
        .await
    {
        Ok(agent) => agent,
        // Already exists from an earlier run
        Err(Error::Validation { .. }) => client.agents().get("demo-agent").await?,
        Err(e) => return Err(e),
    };
    println!("Using agent {}", agent.id);

    println!("=== Memories ===");
    let notes = [
        ("User prefers dark mode in all applications", "preference"),
        ("User works in Python and Rust", "skills"),
        ("User's manager is Grace Hopper", "people"),
    ];
    let mut created = Vec::new();
    for (content, category) in notes {
        let memory = client
            .memories()
            .create(NewMemory::new(content, &agent.id).metadata(json!({ "category": category })))
            .await?;
        println!("Created {}: {}", memory.id, memory.content);
        created.push(memory);
    }

    println!("=== Search ===");
    let hits = client
        .memories()
        .search(
            SearchQuery::new("what does the user like?")
                .agent_id(&agent.id)
                .limit(3)
                .min_score(0.3),
        )
        .await?;
    for hit in &hits {
        println!("{:.3}  {}", hit.score, hit.memory.content);
    }

    println!("=== Entities ===");
    let manager = client
        .entities()
        .create(NewEntity::new("person", "Grace Hopper", &agent.id))
        .await?;
    client.entities().link(&manager.id, &created[2].id).await?;
    println!("Linked {} to {}", manager.entity_value, created[2].id);

    println!("=== Update and list ===");
    let updated = client
        .memories()
        .update(
            &created[0].id,
            MemoryUpdate::new().content("User prefers dark mode, except for printing"),
        )
        .await?;
    println!("Updated {}: {}", updated.id, updated.content);

    let listed = client
        .memories()
        .list(ListMemories::new().agent_id(&agent.id).limit(10))
        .await?;
    println!("Agent has {} memories", listed.len());

    println!("=== Error handling ===");
    match client.memories().get("mem_does_not_exist").await {
        Err(e) => println!("{:?}: {}", e.kind(), e),
        Ok(memory) => println!("Unexpectedly found {}", memory.id),
    }
    match client.memories().create(NewMemory::new("   ", &agent.id)).await {
        Err(e) => println!("Rejected locally: {}", e),
        Ok(_) => println!("Unexpectedly accepted blank content"),
    }

    println!("=== Cleanup ===");
    client.entities().delete(&manager.id).await?;
    for memory in &created {
        client.memories().delete(&memory.id).await?;
    }
    println!("Deleted {} memories", created.len());

    client.close();
    Ok(())
}
