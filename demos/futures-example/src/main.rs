//! Generic futures example for fair-pool
//! This example shows how to use fair-pool with any executor
//! that supports the standard Future trait.

use fair_pool::ResourcePool;
use futures::executor::block_on;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fair Pool with Generic Futures ===\n");

    block_on(async {
        // Example 1: Basic synchronous usage
        basic_sync_usage()?;

        // Example 2: Basic async usage
        basic_async_usage().await?;

        // Example 3: Manual release with claims
        claim_workflow().await?;

        Ok(())
    })
}

fn basic_sync_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. Basic Synchronous Usage");
    println!("--------------------------");

    let pool = ResourcePool::new(vec!["a", "b", "c", "d", "e"])?;
    println!("Created pool with {} resources", pool.size());

    // Try-acquire checkouts
    let first = pool.try_acquire()?;
    println!(
        "Try-acquired {:?}, available: {}",
        *first,
        pool.available()
    );

    let second = pool.try_acquire()?;
    println!(
        "Try-acquired {:?}, available: {}",
        *second,
        pool.available()
    );

    // Release them
    drop(first);
    drop(second);
    println!("Released both, available: {}\n", pool.available());

    Ok(())
}

async fn basic_async_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Basic Async Usage");
    println!("--------------------");

    let pool = Arc::new(ResourcePool::new(vec![
        String::from("conn-1"),
        String::from("conn-2"),
    ])?);
    println!("Created pool with 2 connections");

    // Owned checkouts move freely between futures
    let first = pool.clone().acquire_owned().await?;
    println!("Acquired {:?}, available: {}", &*first, pool.available());

    let second = pool.clone().acquire_owned().await?;
    println!("Acquired {:?}, available: {}", &*second, pool.available());

    drop(first);
    drop(second);
    println!("Released both, available: {}\n", pool.available());

    Ok(())
}

async fn claim_workflow() -> Result<(), Box<dyn std::error::Error>> {
    println!("3. Manual Release with Claims");
    println!("-----------------------------");

    let pool = ResourcePool::new(vec![String::from("lease")])?;

    // Dismantle the guard; the caller now owns the release duty
    let (claim, resource) = pool.acquire().await?.into_claim();
    println!(
        "Took {:?} with a claim, available: {}",
        resource,
        pool.available()
    );

    // Settle the claim
    pool.release(claim, resource)
        .unwrap_or_else(|e| println!("Release failed: {}", e));
    println!("Settled the claim, available: {}", pool.available());

    // A claim settles only once; the replay is rejected
    match pool.release(claim, String::from("lease")) {
        Ok(()) => println!("Unexpected success!"),
        Err(e) => println!("Replay rejected: {}", e),
    }
    println!("Available unchanged: {}\n", pool.available());

    Ok(())
}
