use crate::pool::core::{ResourcePool, Slot};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Token identifying one live checkout for a manual release.
///
/// A claim is minted by [`Checkout::into_claim`] or
/// [`OwnedCheckout::into_claim`] and settles exactly once: the first
/// [`release`](ResourcePool::release) with it succeeds, every replay is
/// rejected, and a claim handed to a different pool is rejected as foreign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Claim {
    pub(crate) pool_id: u64,
    pub(crate) index: usize,
    pub(crate) generation: u64,
}

/// A checked-out resource, borrowed from the pool.
///
/// The guard dereferences to the resource. Dropping it releases the slot:
/// straight to the oldest queued waiter if there is one, back to the free set
/// otherwise.
///
/// # Examples
///
/// ```rust
/// use fair_pool::ResourcePool;
///
/// # #[tokio::main]
/// # async fn main() {
/// let pool = ResourcePool::new(vec![String::from("conn-1")]).unwrap();
///
/// let conn = pool.acquire().await.unwrap();
/// assert_eq!(&*conn, "conn-1");
/// // Released when `conn` goes out of scope.
/// # }
/// ```
pub struct Checkout<'a, R> {
    pub(crate) pool: &'a ResourcePool<R>,
    pub(crate) parts: Option<(Claim, R)>,
}

/// A checked-out resource that keeps its pool alive via `Arc`.
///
/// Same contract as [`Checkout`], but free of the pool's lifetime, so it can
/// move into spawned tasks.
///
/// # Examples
///
/// ```rust
/// use fair_pool::ResourcePool;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let pool = Arc::new(ResourcePool::new(vec![0u8]).unwrap());
///
/// let checkout = pool.clone().acquire_owned().await.unwrap();
/// tokio::spawn(async move {
///     let _byte = *checkout;
///     // Released when the task finishes with it.
/// })
/// .await
/// .unwrap();
/// # }
/// ```
pub struct OwnedCheckout<R> {
    pub(crate) pool: Arc<ResourcePool<R>>,
    pub(crate) parts: Option<(Claim, R)>,
}

impl<R> Checkout<'_, R> {
    /// Dismantles the guard into a claim and the raw resource.
    ///
    /// The slot stays checked out; the caller takes over the release duty and
    /// settles it later with [`ResourcePool::release`]. Until then the
    /// resource counts against the pool's ceiling exactly as a held guard
    /// would.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let pool = ResourcePool::new(vec![10u32]).unwrap();
    ///
    /// let (claim, value) = pool.acquire().await.unwrap().into_claim();
    /// assert_eq!(pool.available(), 0);
    ///
    /// pool.release(claim, value).unwrap();
    /// assert_eq!(pool.available(), 1);
    /// # }
    /// ```
    pub fn into_claim(mut self) -> (Claim, R) {
        self.parts.take().unwrap()
    }
}

impl<R> OwnedCheckout<R> {
    /// Dismantles the guard into a claim and the raw resource.
    ///
    /// See [`Checkout::into_claim`].
    pub fn into_claim(mut self) -> (Claim, R) {
        self.parts.take().unwrap()
    }

    /// Returns the pool this checkout came from.
    pub fn pool(&self) -> &Arc<ResourcePool<R>> {
        &self.pool
    }
}

impl<R> Deref for Checkout<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.parts.as_ref().unwrap().1
    }
}

impl<R> DerefMut for Checkout<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.parts.as_mut().unwrap().1
    }
}

impl<R> Deref for OwnedCheckout<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.parts.as_ref().unwrap().1
    }
}

impl<R> DerefMut for OwnedCheckout<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.parts.as_mut().unwrap().1
    }
}

impl<R> Drop for Checkout<'_, R> {
    fn drop(&mut self) {
        if let Some((claim, resource)) = self.parts.take() {
            self.pool.hand_back(Slot {
                index: claim.index,
                resource,
            });
        }
    }
}

impl<R> Drop for OwnedCheckout<R> {
    fn drop(&mut self) {
        if let Some((claim, resource)) = self.parts.take() {
            self.pool.hand_back(Slot {
                index: claim.index,
                resource,
            });
        }
    }
}

// Debug implementations
impl<R> fmt::Debug for Checkout<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout")
            .field("slot", &self.parts.as_ref().map(|(claim, _)| claim.index))
            .finish()
    }
}

impl<R> fmt::Debug for OwnedCheckout<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedCheckout")
            .field("slot", &self.parts.as_ref().map(|(claim, _)| claim.index))
            .finish()
    }
}
