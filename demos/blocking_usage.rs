//! The blocking client, for code without an async runtime.
//!
//! Run with: `MEMORYRELAY_API_KEY=mem_... cargo run --example blocking_usage`

use memoryrelay::{BatchMemoryItem, ClientBuilder, Error, NewMemory, PollOptions, SearchQuery};
use std::time::Duration;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("memoryrelay=debug,blocking_usage=info")
        .init();

    let client = ClientBuilder::from_env()?
        .timeout(Duration::from_secs(10))
        .build_blocking()?;
    let agent_id = "demo-agent";

    println!("=== Batch create ===");
    let items = vec![
        BatchMemoryItem::new("User prefers metric units")
            .agent_id(agent_id)
            .client_id("units"),
        BatchMemoryItem::new("User is based in Lisbon")
            .agent_id(agent_id)
            .client_id("city"),
    ];
    let batch = client.memories().create_batch(items, true)?;
    println!(
        "{} of {} created ({} skipped, {} failed)",
        batch.succeeded, batch.total, batch.skipped, batch.failed
    );
    for result in &batch.results {
        println!("  {:?} {:?} {:?}", result.client_id, result.status, result.memory_id);
    }

    println!("=== Search ===");
    for hit in client
        .memories()
        .search(SearchQuery::new("where does the user live?").agent_id(agent_id))?
    {
        println!("{:.3}  {}", hit.score, hit.memory.content);
    }

    println!("=== v2 create and wait ===");
    let memory = client.memories().create_and_wait(
        NewMemory::new("User's timezone is Europe/Lisbon", agent_id),
        PollOptions::default(),
    )?;
    println!("{} ready", memory.id);

    for id in batch.created_ids().chain(std::iter::once(memory.id.as_str())) {
        client.memories().delete(id)?;
    }

    Ok(())
}
