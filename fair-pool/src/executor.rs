use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::AcquireError;
use crate::pool::{OwnedCheckout, ResourcePool};

/// Wraps an async work function so every invocation runs while holding a
/// checkout from a shared [`ResourcePool`].
///
/// The executor acquires a resource, passes the [`OwnedCheckout`] to the work
/// function by value, and returns whatever the work function produces. The
/// resource is handed back when the checkout drops, which happens on normal
/// completion, on panic, and when the work future is dropped mid-flight.
///
/// If the wrapped function fails, its error comes back to the caller inside
/// `Ok`; the executor never inspects or swallows it. The executor itself only
/// fails when the pool is closed, in which case the work function is never
/// invoked.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fair_pool::{LimitedExecutor, OwnedCheckout, ResourcePool};
///
/// # #[tokio::main]
/// # async fn main() {
/// let pool = Arc::new(ResourcePool::new(vec![8080u16]).unwrap());
/// let executor = LimitedExecutor::new(
///     pool,
///     |port: OwnedCheckout<u16>, request: String| async move {
///         format!("{} via port {}", request, *port)
///     },
/// );
///
/// let reply = executor.call("GET /".to_string()).await.unwrap();
/// assert_eq!(reply, "GET / via port 8080");
///
/// // The port went back to the pool when the call finished.
/// assert_eq!(executor.pool().available(), 1);
/// # }
/// ```
pub struct LimitedExecutor<R, F> {
    pool: Arc<ResourcePool<R>>,
    work: F,
}

impl<R, F> LimitedExecutor<R, F> {
    /// Creates an executor that runs `work` under checkouts from `pool`.
    ///
    /// The work function receives the checkout and one caller-supplied
    /// argument per call. It keeps the checkout for as long as it needs the
    /// resource; dropping it early releases early.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use fair_pool::{LimitedExecutor, OwnedCheckout, ResourcePool};
    ///
    /// let pool = Arc::new(ResourcePool::new(vec!["conn-a", "conn-b"]).unwrap());
    /// let executor = LimitedExecutor::new(
    ///     pool,
    ///     |conn: OwnedCheckout<&'static str>, query: String| async move {
    ///         format!("{} on {}", query, *conn)
    ///     },
    /// );
    /// # let _ = executor;
    /// ```
    pub fn new(pool: Arc<ResourcePool<R>>, work: F) -> Self {
        Self { pool, work }
    }

    /// Returns the pool this executor draws from.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use fair_pool::{LimitedExecutor, OwnedCheckout, ResourcePool};
    ///
    /// let pool = Arc::new(ResourcePool::new(vec![1, 2, 3]).unwrap());
    /// let executor = LimitedExecutor::new(pool, |n: OwnedCheckout<i32>, ()| async move { *n });
    ///
    /// assert_eq!(executor.pool().size(), 3);
    /// ```
    pub fn pool(&self) -> &Arc<ResourcePool<R>> {
        &self.pool
    }

    /// Acquires a resource, runs the work function with it, and releases it.
    ///
    /// Waits in arrival order if no resource is free. Once a checkout is
    /// obtained the work function runs to completion and its output is
    /// returned in `Ok`, including any error value the work function itself
    /// produces. The checkout drops when the work future ends, for any
    /// reason, so the resource always returns to the pool.
    ///
    /// Returns [`AcquireError`] without invoking the work function if the
    /// pool is closed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use fair_pool::{LimitedExecutor, OwnedCheckout, ResourcePool};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let pool = Arc::new(ResourcePool::new(vec![10]).unwrap());
    /// let executor = LimitedExecutor::new(
    ///     pool,
    ///     |n: OwnedCheckout<i32>, factor: i32| async move {
    ///         if factor == 0 {
    ///             Err("zero factor")
    ///         } else {
    ///             Ok(*n * factor)
    ///         }
    ///     },
    /// );
    ///
    /// // Work errors pass through untouched.
    /// assert_eq!(executor.call(3).await.unwrap(), Ok(30));
    /// assert_eq!(executor.call(0).await.unwrap(), Err("zero factor"));
    ///
    /// // A closed pool fails the call itself.
    /// executor.pool().close();
    /// assert!(executor.call(3).await.is_err());
    /// # }
    /// ```
    pub async fn call<A, Fut, T>(&self, arg: A) -> Result<T, AcquireError>
    where
        F: Fn(OwnedCheckout<R>, A) -> Fut,
        Fut: Future<Output = T>,
    {
        let checkout = Arc::clone(&self.pool).acquire_owned().await?;
        Ok((self.work)(checkout, arg).await)
    }
}

impl<R, F> fmt::Debug for LimitedExecutor<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimitedExecutor")
            .field("pool", &self.pool)
            .finish()
    }
}
