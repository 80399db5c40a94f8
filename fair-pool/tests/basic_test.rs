use fair_pool::{AcquireError, EmptyPoolError, ResourcePool, TryAcquireError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

#[tokio::test]
async fn test_pool_creation() {
    let pool = ResourcePool::new(vec!["alpha", "beta", "gamma"]).unwrap();
    assert_eq!(pool.size(), 3);
    assert_eq!(pool.available(), 3);
    assert!(!pool.is_closed());
}

#[tokio::test]
async fn test_pool_creation_from_iterator() {
    let pool = ResourcePool::new(0..4).unwrap();
    assert_eq!(pool.size(), 4);
    assert_eq!(pool.available(), 4);
}

#[tokio::test]
async fn test_pool_creation_empty() {
    let result = ResourcePool::<u32>::new(Vec::new());
    assert!(matches!(result, Err(EmptyPoolError)));
}

#[tokio::test]
async fn test_builder_basics() {
    let pool = ResourcePool::builder()
        .resource("primary")
        .resources(["replica-1", "replica-2"])
        .label("db-connections")
        .build()
        .unwrap();

    assert_eq!(pool.size(), 3);
    assert_eq!(pool.label(), Some("db-connections"));
}

#[tokio::test]
async fn test_builder_empty_rejected() {
    let result = ResourcePool::<u32>::builder().build();
    assert!(matches!(result, Err(EmptyPoolError)));
}

#[tokio::test]
async fn test_try_acquire_success() {
    let pool = ResourcePool::new(vec![1, 2, 3]).unwrap();

    let first = pool.try_acquire().unwrap();
    assert_eq!(pool.available(), 2);

    let second = pool.try_acquire().unwrap();
    assert_eq!(pool.available(), 1);

    let third = pool.try_acquire().unwrap();
    assert_eq!(pool.available(), 0);

    // Every pooled value is out exactly once.
    let mut held = vec![*first, *second, *third];
    held.sort();
    assert_eq!(held, vec![1, 2, 3]);

    // Clean up
    drop(first);
    drop(second);
    drop(third);
}

#[tokio::test]
async fn test_try_acquire_exhausted() {
    let pool = ResourcePool::new(vec!['x']).unwrap();

    let _held = pool.try_acquire().unwrap();
    assert_eq!(pool.available(), 0);

    // Should fail while the only resource is out
    let result = pool.try_acquire();
    assert!(matches!(result, Err(TryAcquireError::NoResources)));
}

#[tokio::test]
async fn test_try_acquire_owned() {
    let pool = Arc::new(ResourcePool::new(vec![String::from("conn")]).unwrap());

    let held = pool.clone().try_acquire_owned().unwrap();
    assert_eq!(*held, "conn");
    assert_eq!(pool.available(), 0);

    drop(held);
    assert_eq!(pool.available(), 1);
}

#[tokio::test]
async fn test_async_acquire_success() {
    let pool = ResourcePool::new(vec![10, 20]).unwrap();

    let first = timeout(Duration::from_millis(100), pool.acquire())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pool.available(), 1);

    let second = timeout(Duration::from_millis(100), pool.acquire())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pool.available(), 0);

    drop(first);
    drop(second);
    assert_eq!(pool.available(), 2);
}

#[tokio::test]
async fn test_acquire_owned_success() {
    let pool = Arc::new(ResourcePool::new(vec![7u64]).unwrap());

    let held = timeout(Duration::from_millis(100), pool.clone().acquire_owned())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*held, 7);
    assert_eq!(pool.available(), 0);
}

#[tokio::test]
async fn test_pool_close_basic() {
    let pool = ResourcePool::new(vec![1, 2]).unwrap();
    assert!(!pool.is_closed());

    pool.close();
    assert!(pool.is_closed());

    // try_acquire should fail on a closed pool even with free resources
    let result = pool.try_acquire();
    assert!(matches!(result, Err(TryAcquireError::Closed)));
}

#[tokio::test]
async fn test_pool_close_async_acquire() {
    let pool = Arc::new(ResourcePool::new(vec!["only"]).unwrap());
    let held = pool.try_acquire().unwrap();

    // Start an acquire that has to wait
    let pool_for_task = Arc::clone(&pool);
    let acquire_task = tokio::spawn(async move { pool_for_task.acquire_owned().await });

    // Give some time for the acquire to register as waiting
    sleep(Duration::from_millis(10)).await;
    assert_eq!(pool.waiting(), 1);

    pool.close();

    // The queued acquire should fail with AcquireError
    let result = timeout(Duration::from_millis(100), acquire_task).await;
    let acquire_result = result.unwrap().unwrap();
    assert!(matches!(acquire_result, Err(AcquireError { .. })));

    drop(held);
}

#[tokio::test]
async fn test_close_idempotent() {
    let pool = ResourcePool::new(vec![1]).unwrap();

    pool.close();
    pool.close();
    assert!(pool.is_closed());
}

#[tokio::test]
async fn test_try_acquire_closed_pool() {
    let pool = Arc::new(ResourcePool::new(vec![1, 2, 3]).unwrap());
    pool.close();

    let result = pool.try_acquire();
    assert!(matches!(result, Err(TryAcquireError::Closed)));

    let result_owned = pool.clone().try_acquire_owned();
    assert!(matches!(result_owned, Err(TryAcquireError::Closed)));
}

#[tokio::test]
async fn test_available_consistency() {
    let pool = ResourcePool::new(0..10).unwrap();

    // Check out half the pool one by one
    let mut checkouts = Vec::new();

    for i in 1..=5 {
        let checkout = pool.try_acquire().unwrap();
        checkouts.push(checkout);
        assert_eq!(pool.available(), 10 - i);
    }

    // Release them one by one
    for i in 1..=5 {
        checkouts.pop();
        assert_eq!(pool.available(), 5 + i);
    }
}

#[tokio::test]
async fn test_checkout_drop_behavior() {
    let pool = ResourcePool::new(vec!["a", "b", "c"]).unwrap();

    {
        let _first = pool.try_acquire().unwrap();
        let _second = pool.try_acquire().unwrap();
        assert_eq!(pool.available(), 1);

        // Checkouts release on drop
    }

    assert_eq!(pool.available(), 3);
}

#[tokio::test]
async fn test_resource_round_trips_through_pool() {
    let pool = ResourcePool::new(vec![String::from("session")]).unwrap();

    for _ in 0..3 {
        let held = pool.acquire().await.unwrap();
        assert_eq!(*held, "session");
    }
}

#[tokio::test]
async fn test_error_display_formatting() {
    // AcquireError through an actually closed pool
    let pool = Arc::new(ResourcePool::new(vec![1]).unwrap());
    let held = pool.try_acquire().unwrap();
    pool.close();
    let acquire_result = timeout(Duration::from_millis(50), pool.acquire()).await;
    if let Ok(Err(acquire_error)) = acquire_result {
        assert_eq!(format!("{acquire_error}"), "resource pool closed");
    }
    drop(held);

    let try_acquire_closed = TryAcquireError::Closed;
    assert_eq!(format!("{try_acquire_closed}"), "resource pool closed");

    let try_acquire_empty = TryAcquireError::NoResources;
    assert_eq!(format!("{try_acquire_empty}"), "no free resource");

    assert_eq!(
        format!("{EmptyPoolError}"),
        "resource pool requires at least one resource"
    );
}

#[tokio::test]
async fn test_try_acquire_error_methods() {
    let closed_error = TryAcquireError::Closed;
    assert!(closed_error.is_closed());
    assert!(!closed_error.is_no_resources());

    let no_resources_error = TryAcquireError::NoResources;
    assert!(!no_resources_error.is_closed());
    assert!(no_resources_error.is_no_resources());
}

#[tokio::test]
async fn test_edge_case_rapid_acquire_release() {
    let pool = ResourcePool::new(vec![42]).unwrap();

    // Rapidly check out and return the same resource
    for _ in 0..100 {
        let held = pool.try_acquire().unwrap();
        assert_eq!(*held, 42);
        assert_eq!(pool.available(), 0);
        drop(held);
        assert_eq!(pool.available(), 1);
    }
}

#[tokio::test]
async fn test_edge_case_single_resource_pool() {
    let pool = ResourcePool::new(vec!["solo"]).unwrap();

    let held = pool.try_acquire().unwrap();
    assert_eq!(pool.available(), 0);

    // Should fail to acquire more
    let result = pool.try_acquire();
    assert!(matches!(result, Err(TryAcquireError::NoResources)));

    drop(held);
    assert_eq!(pool.available(), 1);
}

#[tokio::test]
async fn test_debug_formatting() {
    let pool = ResourcePool::new(vec![1, 2]).unwrap();
    let debug_str = format!("{pool:?}");
    assert!(debug_str.contains("ResourcePool"));

    let checkout = pool.try_acquire().unwrap();
    let checkout_debug = format!("{checkout:?}");
    assert!(checkout_debug.contains("Checkout"));
}

#[tokio::test]
async fn test_send_sync_bounds() {
    // ResourcePool must be shareable across tasks and threads
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourcePool<String>>();
    assert_send_sync::<fair_pool::OwnedCheckout<String>>();

    // Exercise across a task boundary
    let pool = Arc::new(ResourcePool::new(vec![String::from("shared")]).unwrap());
    let pool_clone = Arc::clone(&pool);

    let handle = tokio::spawn(async move {
        let _held = pool_clone.try_acquire_owned().unwrap();
    });

    handle.await.unwrap();
}

#[tokio::test]
async fn test_async_context_switching() {
    let pool = ResourcePool::new(vec![5]).unwrap();

    let held = pool.acquire().await.unwrap();

    // Yield to allow other tasks to run
    tokio::task::yield_now().await;

    assert_eq!(pool.available(), 0);
    drop(held);
    assert_eq!(pool.available(), 1);
}
