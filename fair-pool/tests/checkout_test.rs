//! Checkout and manual release tests
//!
//! Covers the claim workflow: dismantling a guard with into_claim, settling
//! the claim with release, and the two ways a release can be rejected.

use fair_pool::{ResourcePool, TryAcquireError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

#[tokio::test]
async fn test_into_claim_and_release() {
    let pool = ResourcePool::new(vec![String::from("conn")]).unwrap();

    let (claim, conn) = pool.acquire().await.unwrap().into_claim();
    assert_eq!(conn, "conn");
    assert_eq!(pool.available(), 0);

    pool.release(claim, conn).unwrap();
    assert_eq!(pool.available(), 1);
}

#[tokio::test]
async fn test_owned_into_claim_and_release() {
    let pool = Arc::new(ResourcePool::new(vec![11u32]).unwrap());

    let checkout = pool.clone().acquire_owned().await.unwrap();
    assert!(Arc::ptr_eq(checkout.pool(), &pool));

    let (claim, value) = checkout.into_claim();
    assert_eq!(value, 11);
    assert_eq!(pool.available(), 0);

    pool.release(claim, value).unwrap();
    assert_eq!(pool.available(), 1);
}

#[tokio::test]
async fn test_double_release_detected() {
    let pool = ResourcePool::new(vec![String::from("conn")]).unwrap();

    let (claim, conn) = pool.acquire().await.unwrap().into_claim();
    pool.release(claim, conn).unwrap();
    assert_eq!(pool.available(), 1);

    // Claims are Copy; replaying one must be rejected
    let err = pool.release(claim, String::from("conn")).unwrap_err();
    assert!(err.is_double_release());
    assert!(!err.is_foreign());
    assert_eq!(err.into_inner(), "conn");

    // The bookkeeping must be untouched by the rejection
    assert_eq!(pool.available(), 1);
}

#[tokio::test]
async fn test_stale_claim_rejected_after_recheckout() {
    let pool = ResourcePool::new(vec![0u8]).unwrap();

    let (old_claim, value) = pool.acquire().await.unwrap().into_claim();
    pool.release(old_claim, value).unwrap();

    // The slot is out again under a fresh claim
    let current = pool.acquire().await.unwrap();
    assert_eq!(pool.available(), 0);

    // The settled claim must not free the slot out from under `current`
    let err = pool.release(old_claim, 0u8).unwrap_err();
    assert!(err.is_double_release());
    assert_eq!(pool.available(), 0);

    drop(current);
    assert_eq!(pool.available(), 1);
}

#[tokio::test]
async fn test_foreign_resource_rejected() {
    let ours = ResourcePool::new(vec![String::from("mine")]).unwrap();
    let theirs = ResourcePool::new(vec![String::from("other")]).unwrap();

    let (claim, resource) = ours.acquire().await.unwrap().into_claim();

    // A claim minted by one pool means nothing to another
    let err = theirs.release(claim, resource).unwrap_err();
    assert!(err.is_foreign());
    assert!(!err.is_double_release());
    assert_eq!(theirs.available(), 1);

    // The resource survives the rejection and settles in the right pool
    let resource = err.into_inner();
    ours.release(claim, resource).unwrap();
    assert_eq!(ours.available(), 1);
}

#[tokio::test]
async fn test_release_reaches_queued_waiter() {
    let pool = Arc::new(ResourcePool::new(vec![String::from("baton")]).unwrap());
    let (claim, baton) = pool.acquire().await.unwrap().into_claim();

    let pool_clone = Arc::clone(&pool);
    let waiter = tokio::spawn(async move {
        let held = pool_clone.acquire_owned().await.unwrap();
        (*held).clone()
    });

    // Confirm the waiter is parked before releasing
    for _ in 0..200 {
        if pool.waiting() == 1 {
            break;
        }
        sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(pool.waiting(), 1);

    // A manual release hands off exactly like a guard drop
    pool.release(claim, baton).unwrap();
    assert_eq!(pool.available(), 0);

    let got = timeout(Duration::from_millis(1000), waiter)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(got, "baton");
}

#[tokio::test]
async fn test_release_after_close_drains() {
    let pool = ResourcePool::new(vec![1, 2]).unwrap();
    let (claim, value) = pool.acquire().await.unwrap().into_claim();

    pool.close();
    assert_eq!(pool.available(), 1);

    // Outstanding resources drain back even though the pool is closed
    pool.release(claim, value).unwrap();
    assert_eq!(pool.available(), 2);
    assert!(matches!(pool.try_acquire(), Err(TryAcquireError::Closed)));
}

#[tokio::test]
async fn test_deref_mut_mutation_persists() {
    let pool = ResourcePool::new(vec![String::from("session")]).unwrap();

    {
        let mut held = pool.acquire().await.unwrap();
        held.push_str("-used");
    }

    // The pool stores the mutated value, not a copy
    let held = pool.acquire().await.unwrap();
    assert_eq!(*held, "session-used");
}

#[tokio::test]
async fn test_claims_identify_distinct_checkouts() {
    let pool = ResourcePool::new(vec![1, 2]).unwrap();

    let (claim_a, value_a) = pool.acquire().await.unwrap().into_claim();
    let (claim_b, value_b) = pool.acquire().await.unwrap().into_claim();
    assert_ne!(claim_a, claim_b);

    pool.release(claim_a, value_a).unwrap();
    pool.release(claim_b, value_b).unwrap();
    assert_eq!(pool.available(), 2);
}

#[tokio::test]
async fn test_release_error_formatting() {
    let pool = ResourcePool::new(vec![9]).unwrap();
    let (claim, value) = pool.acquire().await.unwrap().into_claim();
    pool.release(claim, value).unwrap();

    let err = pool.release(claim, 9).unwrap_err();
    assert_eq!(format!("{err}"), "resource released twice");
    assert_eq!(format!("{err:?}"), "DoubleRelease(..)");

    let other_pool = ResourcePool::new(vec![1]).unwrap();
    let (other_claim, other_value) = other_pool.acquire().await.unwrap().into_claim();
    let err = pool.release(other_claim, other_value).unwrap_err();
    assert_eq!(format!("{err}"), "resource belongs to a different pool");
    assert_eq!(format!("{err:?}"), "ForeignResource(..)");
}
