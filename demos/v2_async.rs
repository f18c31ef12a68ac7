//! v2 asynchronous memory creation.
//!
//! `create_async` returns as soon as the server has queued the embedding job.
//! This example shows the three ways to consume that:
//! - fire and forget, checking the status later
//! - explicit `wait_for_ready`
//! - `create_and_wait` in one call
//! It also queues several memories and waits for them concurrently.
//!
//! Run with: `MEMORYRELAY_API_KEY=mem_... cargo run --example v2_async`

use memoryrelay::{ClientBuilder, Error, ErrorKind, NewMemory, PollOptions};
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("memoryrelay=debug,v2_async=info")
        .init();

    let client = ClientBuilder::from_env()?.build()?;
    let agent_id = "demo-agent";

    println!("=== Queue, then check status ===");
    let job = client
        .memories()
        .create_async(NewMemory::new("Quarterly planning starts on Monday", agent_id))
        .await?;
    println!(
        "Queued {} as job {} (status {}, ~{}s)",
        job.id,
        job.job_id,
        job.status,
        job.estimated_completion_seconds.unwrap_or(0)
    );
    let status = client.memories().get_status(&job.id).await?;
    println!("Status now: {}", status.status);

    println!("=== Wait for ready ===");
    let memory = client
        .memories()
        .wait_for_ready(&job.id, PollOptions::default())
        .await?;
    println!(
        "{} is ready with a {}-dimension embedding",
        memory.id,
        memory.embedding.as_ref().map_or(0, Vec::len)
    );

    println!("=== Create and wait ===");
    let start = Instant::now();
    let options = PollOptions::new(Duration::from_secs(60), Duration::from_millis(250));
    match client
        .memories()
        .create_and_wait(NewMemory::new("User's favorite editor is Helix", agent_id), options)
        .await
    {
        Ok(memory) => println!("{} ready after {:?}", memory.id, start.elapsed()),
        Err(e) if e.kind() == ErrorKind::Timeout => {
            // The job keeps running server-side; check back later
            println!("Still processing: {}", e);
        }
        Err(e) => return Err(e),
    }

    println!("=== Many at once ===");
    let contents = [
        "Team standup is at 9:30",
        "Deploys are frozen on Fridays",
        "The staging database is refreshed nightly",
    ];
    let mut ids = Vec::new();
    for content in contents {
        let job = client
            .memories()
            .create_async(NewMemory::new(content, agent_id))
            .await?;
        ids.push(job.id);
    }

    let waits = ids.iter().map(|id| {
        let client = client.clone();
        let id = id.clone();
        tokio::spawn(async move {
            client
                .memories()
                .wait_for_ready(&id, PollOptions::default())
                .await
        })
    });
    for handle in waits.collect::<Vec<_>>() {
        match handle.await {
            Ok(Ok(memory)) => println!("ready: {}", memory.content),
            Ok(Err(e)) => println!("failed: {}", e),
            Err(e) => println!("task panicked: {}", e),
        }
    }

    Ok(())
}
