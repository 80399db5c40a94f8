//! Tokio runtime example for fair-pool

use fair_pool::{LimitedExecutor, OwnedCheckout, ResourcePool};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Surface the pool's tracing events on stdout
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .init();

    println!("=== Fair Pool with Tokio Runtime ===\n");

    // Example 1: Basic usage
    basic_usage().await?;

    // Example 2: Fair hand-off to queued tasks
    fair_handoff().await?;

    // Example 3: A limited worker pool
    limited_worker_pool().await?;

    Ok(())
}

async fn basic_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. Basic Usage");
    println!("--------------");

    let pool = ResourcePool::builder()
        .resources([
            String::from("conn-alpha"),
            String::from("conn-beta"),
            String::from("conn-gamma"),
        ])
        .label("demo-connections")
        .build()?;
    println!("Created pool with {} connections", pool.size());

    // Check connections out
    let first = pool.acquire().await?;
    println!("Acquired {:?}, available: {}", &*first, pool.available());

    let second = pool.acquire().await?;
    println!("Acquired {:?}, available: {}", &*second, pool.available());

    let third = pool.acquire().await?;
    println!("Acquired {:?}, available: {}", &*third, pool.available());

    // Try to acquire one more (should fail)
    match pool.try_acquire() {
        Ok(_) => println!("Unexpected success!"),
        Err(e) => println!("Expected failure: {}", e),
    }

    // Return them
    drop(first);
    println!("Released one, available: {}", pool.available());

    drop(second);
    drop(third);
    println!("Released the rest, available: {}\n", pool.available());

    Ok(())
}

async fn fair_handoff() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Fair Hand-off");
    println!("----------------");

    let pool = Arc::new(ResourcePool::new(vec![String::from("the-one")])?);

    // Hold the only resource
    let blocker = pool.acquire().await?;
    println!("Resource held; queuing three tasks");

    let mut handles = Vec::new();

    for id in 1..=3 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let start = std::time::Instant::now();
            let held = pool.acquire_owned().await.unwrap();
            println!(
                "  Task {} got {:?} after {:?}",
                id,
                &*held,
                start.elapsed()
            );

            // Hold it briefly
            tokio::time::sleep(Duration::from_millis(50)).await;
        }));

        // Small delay so the queue order matches the task ids
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // The tasks run strictly in arrival order once this drops
    println!("Releasing the resource...");
    drop(blocker);

    for handle in handles {
        handle.await?;
    }

    println!("All queued tasks served in order\n");
    Ok(())
}

async fn limited_worker_pool() -> Result<(), Box<dyn std::error::Error>> {
    println!("3. Limited Worker Pool");
    println!("----------------------");

    // Five jobs funnel through two workers
    let pool = Arc::new(ResourcePool::new(vec![
        String::from("worker-a"),
        String::from("worker-b"),
    ])?);

    let executor = Arc::new(LimitedExecutor::new(
        pool,
        |worker: OwnedCheckout<String>, job: usize| async move {
            println!("  Job {} running on {:?}", job, &*worker);
            tokio::time::sleep(Duration::from_millis(100)).await;
            drop(worker);
            job
        },
    ));

    let mut handles = Vec::new();
    for job in 1..=5 {
        let executor = executor.clone();
        handles.push(tokio::spawn(async move { executor.call(job).await }));
    }

    for handle in handles {
        let job = handle.await??;
        println!("  Job {} finished", job);
    }

    println!("All jobs done, available: {}\n", executor.pool().available());
    Ok(())
}
