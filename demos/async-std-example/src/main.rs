//! Async-std runtime example for fair-pool

use fair_pool::ResourcePool;
use std::sync::Arc;
use std::time::Duration;

#[async_std::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fair Pool with Async-std Runtime ===\n");

    // Example 1: Basic usage
    basic_usage().await?;

    // Example 2: Queued tasks served in arrival order
    concurrent_tasks().await?;

    Ok(())
}

async fn basic_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. Basic Usage");
    println!("--------------");

    // Create the pool with Arc from the start to avoid borrowing issues
    let pool = Arc::new(ResourcePool::new(vec![
        String::from("conn-1"),
        String::from("conn-2"),
    ])?);
    println!("Created pool with 2 connections");

    // Immediate checkouts
    let first = pool.try_acquire()?;
    println!(
        "Immediately checked out {:?}, available: {}",
        &*first,
        pool.available()
    );

    let second = pool.try_acquire()?;
    println!(
        "Immediately checked out {:?}, available: {}",
        &*second,
        pool.available()
    );

    // Should fail now
    match pool.try_acquire() {
        Ok(_) => println!("Unexpected success!"),
        Err(e) => println!("Expected failure: {}", e),
    }

    // Async checkout from a task
    let pool_clone = pool.clone();

    let task = async_std::task::spawn(async move {
        let held = pool_clone.acquire_owned().await.unwrap();
        println!("Async task got {:?}", &*held);
        async_std::task::sleep(Duration::from_millis(100)).await;
        println!("Async task returning it");
    });

    // Return a connection to unblock the task
    async_std::task::sleep(Duration::from_millis(50)).await;
    drop(first);
    println!("Returned the first connection");

    task.await;

    drop(second);
    println!("Returned the rest, available: {}\n", pool.available());

    Ok(())
}

async fn concurrent_tasks() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Queued Tasks in Arrival Order");
    println!("--------------------------------");

    let pool = Arc::new(ResourcePool::new(vec![String::from("slot")])?);

    // Hold the only resource
    let blocker = pool.acquire().await?;
    println!("Resource held");

    // Queue tasks; they will be served strictly in this order
    let mut tasks = Vec::new();

    for id in [1, 2, 3, 4] {
        let pool = pool.clone();
        tasks.push(async_std::task::spawn(async move {
            let start = std::time::Instant::now();
            let _held = pool.acquire_owned().await.unwrap();
            println!("  Task {} started after {:?}", id, start.elapsed());

            // Simulate some work
            async_std::task::sleep(Duration::from_millis(50)).await;
            println!("  Task {} completed", id);
        }));

        // Small delay to ensure tasks queue in order
        async_std::task::sleep(Duration::from_millis(10)).await;
    }

    // Wait a bit then release the blocker
    async_std::task::sleep(Duration::from_millis(50)).await;
    println!("Releasing the resource...");
    drop(blocker);

    // Wait for all tasks to complete
    for task in tasks {
        task.await;
    }

    println!("All concurrent tasks completed\n");
    Ok(())
}
