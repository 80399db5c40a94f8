use crate::error::{AcquireError, TryAcquireError};
use crate::pool::checkout::{Checkout, OwnedCheckout};
use crate::pool::futures::{Acquire, AcquireOwned};
use std::future::Future;
use std::sync::Arc;

impl<R> super::ResourcePool<R> {
    // === Async acquire ===

    /// Acquires a resource, waiting for one if the pool is exhausted.
    ///
    /// Waiters are served strictly in arrival order: a released resource is
    /// handed directly to the oldest waiter, so a newcomer can never overtake
    /// a parked one. If the pool is closed before a resource is granted, the
    /// future resolves with [`AcquireError`].
    ///
    /// Dropping the returned future cancels the request without losing a
    /// resource; see [`Acquire`] for the exact semantics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let pool = ResourcePool::new(vec!["conn"]).unwrap();
    /// let conn = pool.acquire().await.unwrap();
    /// // Released when dropped.
    /// # drop(conn);
    /// # }
    /// ```
    pub fn acquire(&self) -> Acquire<'_, R> {
        Acquire {
            pool: self,
            waiter: None,
        }
    }

    /// Acquires a resource as an owned checkout.
    ///
    /// Same contract as [`acquire`](Self::acquire), but the pool must be
    /// wrapped in an `Arc` and the resulting [`OwnedCheckout`] can move into
    /// spawned tasks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let pool = Arc::new(ResourcePool::new(vec!["conn"]).unwrap());
    /// let conn = pool.clone().acquire_owned().await.unwrap();
    /// tokio::spawn(async move {
    ///     // Work with `conn` off-task; released when dropped.
    ///     drop(conn);
    /// });
    /// # }
    /// ```
    pub fn acquire_owned(self: Arc<Self>) -> AcquireOwned<R> {
        AcquireOwned {
            pool: self,
            waiter: None,
        }
    }

    // === Non-blocking acquire ===

    /// Attempts to acquire a resource without waiting.
    ///
    /// # Returns
    ///
    /// * `Ok(Checkout)` - a resource was free
    /// * `Err(TryAcquireError::Closed)` - the pool is closed
    /// * `Err(TryAcquireError::NoResources)` - everything is checked out
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::{ResourcePool, TryAcquireError};
    ///
    /// let pool = ResourcePool::new(vec![1]).unwrap();
    /// let _held = pool.try_acquire().unwrap();
    ///
    /// match pool.try_acquire() {
    ///     Ok(_) => panic!("should not succeed"),
    ///     Err(TryAcquireError::NoResources) => println!("pool exhausted"),
    ///     Err(TryAcquireError::Closed) => println!("pool closed"),
    /// };
    /// ```
    pub fn try_acquire(&self) -> Result<Checkout<'_, R>, TryAcquireError> {
        let mut shared = self.shared.lock().unwrap();
        if shared.closed {
            return Err(TryAcquireError::Closed);
        }
        match self.take_free_locked(&mut shared) {
            Some(parts) => Ok(Checkout {
                pool: self,
                parts: Some(parts),
            }),
            None => Err(TryAcquireError::NoResources),
        }
    }

    /// Attempts to acquire an owned checkout without waiting.
    ///
    /// The pool must be wrapped in an `Arc`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::{ResourcePool, TryAcquireError};
    /// use std::sync::Arc;
    ///
    /// let pool = Arc::new(ResourcePool::new(vec![1]).unwrap());
    /// let _held = pool.clone().try_acquire_owned().unwrap();
    ///
    /// match pool.clone().try_acquire_owned() {
    ///     Ok(_) => panic!("should not succeed"),
    ///     Err(TryAcquireError::NoResources) => println!("pool exhausted"),
    ///     Err(TryAcquireError::Closed) => println!("pool closed"),
    /// };
    /// ```
    pub fn try_acquire_owned(self: Arc<Self>) -> Result<OwnedCheckout<R>, TryAcquireError> {
        let parts = {
            let mut shared = self.shared.lock().unwrap();
            if shared.closed {
                return Err(TryAcquireError::Closed);
            }
            match self.take_free_locked(&mut shared) {
                Some(parts) => parts,
                None => return Err(TryAcquireError::NoResources),
            }
        };
        Ok(OwnedCheckout {
            pool: self,
            parts: Some(parts),
        })
    }

    // === One-shot execution ===

    /// Acquires a resource, runs `work` with it, and releases it afterwards.
    ///
    /// The checkout is passed to `work` by value; when the returned future
    /// finishes (or is cancelled, or unwinds) the guard drops and the
    /// resource goes back to the pool. The work's output passes through
    /// unchanged. If the pool is closed before a resource is granted, `work`
    /// is never invoked.
    ///
    /// For a reusable version of this pattern see
    /// [`LimitedExecutor`](crate::LimitedExecutor).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let pool = Arc::new(ResourcePool::new(vec![2u32]).unwrap());
    ///
    /// let doubled = pool
    ///     .clone()
    ///     .run(|value| async move { *value * 2 })
    ///     .await
    ///     .unwrap();
    /// assert_eq!(doubled, 4);
    /// # }
    /// ```
    pub async fn run<F, Fut, T>(self: Arc<Self>, work: F) -> Result<T, AcquireError>
    where
        F: FnOnce(OwnedCheckout<R>) -> Fut,
        Fut: Future<Output = T>,
    {
        let checkout = self.acquire_owned().await?;
        Ok(work(checkout).await)
    }
}
