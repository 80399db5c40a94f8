
use fair_pool::ResourcePool;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    smol::block_on(async {
        println!("=== Fair Pool with Smol Runtime ===\n");

        // Example 1: Basic usage
        basic_usage().await?;

        // Example 2: Closing the pool
        close_behavior().await?;

        Ok(())
    })
}

async fn basic_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. Basic Usage");
    println!("--------------");

    // Create the pool with Arc from the start
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

    // Async checkout from a spawned task
    let pool_clone = pool.clone();

    let task = smol::spawn(async move {
        let held = pool_clone.acquire_owned().await.unwrap();
        println!("Async task got {:?}", &*held);
        smol::Timer::after(Duration::from_millis(100)).await;
        println!("Async task returning it");
    });

    // Return one connection to unblock the task
    smol::Timer::after(Duration::from_millis(50)).await;
    drop(first);
    println!("Returned the first connection");

    task.await;

    drop(second);
    println!("Returned the rest, available: {}\n", pool.available());

    Ok(())
}

async fn close_behavior() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Closing the Pool");
    println!("-------------------");

    let pool = Arc::new(ResourcePool::new(vec![String::from("slot")])?);

    // Hold the only resource and queue two tasks behind it
    let blocker = pool.acquire().await?;
    println!("Resource held; queuing two tasks");

    let mut tasks = Vec::new();
    for id in [1, 2] {
        let pool = pool.clone();
        tasks.push(smol::spawn(async move {
            match pool.acquire_owned().await {
                Ok(_held) => println!("  Task {} unexpectedly got the resource", id),
                Err(e) => println!("  Task {} failed as expected: {}", id, e),
            }
        }));
        smol::Timer::after(Duration::from_millis(10)).await;
    }

    // Closing fails every queued task
    println!("Closing the pool...");
    pool.close();

    for task in tasks {
        task.await;
    }

    // New attempts fail too
    match pool.try_acquire() {
        Ok(_) => println!("Unexpected success!"),
        Err(e) => println!("New checkout rejected: {}", e),
    }

    // The outstanding resource still drains back
    drop(blocker);
    println!("Blocker returned, available: {}\n", pool.available());

    Ok(())
}
