use crate::error::{EmptyPoolError, ReleaseError};
use crate::pool::checkout::Claim;
use crate::wait_queue::WaitQueue;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::task::Waker;

/// Process-unique pool ids let a release tell claims from different pools apart.
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// A resource paired with the pool index it was assigned at construction.
///
/// The index is the identity used for release matching, so the pool never
/// needs to compare resources themselves.
pub(crate) struct Slot<R> {
    pub(crate) index: usize,
    pub(crate) resource: R,
}

/// Per-index bookkeeping for release validation.
pub(crate) struct SlotMeta {
    /// Bumped every time the slot is handed back; a stale claim fails the match.
    pub(crate) generation: u64,
    pub(crate) checked_out: bool,
}

/// Everything the pool mutates, behind one mutex.
///
/// Keeping the free list, the waiter queue and the outstanding flags under a
/// single lock is what makes the release hand-off atomic: nobody can observe
/// a released slot between the queue check and its new home.
pub(crate) struct PoolShared<R> {
    pub(crate) free: Vec<Slot<R>>,
    pub(crate) waiters: WaitQueue<Slot<R>>,
    pub(crate) meta: Box<[SlotMeta]>,
    pub(crate) closed: bool,
}

/// A fixed-size pool of interchangeable resources with FIFO hand-off.
///
/// The pool owns its resources while they are free and lends them out through
/// RAII checkouts. At most `size()` resources are ever out at once; excess
/// acquirers queue in strict arrival order, and a released resource is handed
/// directly to the oldest waiter instead of being parked where a newcomer
/// could snatch it.
///
/// The pool never constructs, inspects or health-checks resources; it only
/// meters access to the set it was built from.
///
/// # Examples
///
/// ```rust
/// use fair_pool::ResourcePool;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let pool = Arc::new(ResourcePool::new(vec!["alpha", "beta"]).unwrap());
///
/// let conn = pool.acquire().await.unwrap();
/// assert_eq!(pool.available(), 1);
///
/// drop(conn);
/// assert_eq!(pool.available(), 2);
/// # }
/// ```
pub struct ResourcePool<R> {
    pub(crate) shared: Mutex<PoolShared<R>>,
    /// Combined free count and status flag using bit operations
    /// Bit layout: [free_count << 1 | closed_flag]
    /// A lock-free mirror of the locked state, for introspection only.
    pub(crate) state: AtomicUsize,
    pub(crate) total: usize,
    pub(crate) id: u64,
    pub(crate) label: Option<String>,
}

impl<R> ResourcePool<R> {
    /// Maximum pool size (reserve 3 bits for flags, same as tokio)
    pub const MAX_RESOURCES: usize = usize::MAX >> 3;

    /// Bit flag constants for state encoding (aligned with tokio)
    pub(crate) const CLOSED: usize = 1;
    pub(crate) const FREE_SHIFT: usize = 1;

    /// Creates a pool owning the given resources.
    ///
    /// Slot indexes are assigned in iteration order. The free list behaves as
    /// a stack, so the most recently returned resource is handed out first;
    /// callers must not rely on any particular pairing of caller and resource.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPoolError`] if the iterator yields no resources; a pool
    /// that can never grant anything is almost certainly a configuration bug.
    ///
    /// # Panics
    ///
    /// Panics if the resource count exceeds `MAX_RESOURCES` (usize::MAX >> 3).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::new(vec![1, 2, 3]).unwrap();
    /// assert_eq!(pool.size(), 3);
    /// assert_eq!(pool.available(), 3);
    ///
    /// assert!(ResourcePool::<u32>::new(Vec::new()).is_err());
    /// ```
    pub fn new(resources: impl IntoIterator<Item = R>) -> Result<Self, EmptyPoolError> {
        let resources: Vec<R> = resources.into_iter().collect();
        if resources.is_empty() {
            return Err(EmptyPoolError);
        }
        if resources.len() > Self::MAX_RESOURCES {
            panic!("resource count exceeds MAX_RESOURCES");
        }
        Ok(Self::from_parts(resources, None))
    }

    pub(crate) fn from_parts(resources: Vec<R>, label: Option<String>) -> Self {
        let total = resources.len();
        let free: Vec<Slot<R>> = resources
            .into_iter()
            .enumerate()
            .map(|(index, resource)| Slot { index, resource })
            .collect();
        let meta: Box<[SlotMeta]> = (0..total)
            .map(|_| SlotMeta {
                generation: 0,
                checked_out: false,
            })
            .collect();
        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            pool = id,
            size = total,
            label = label.as_deref().unwrap_or(""),
            "resource pool created"
        );

        Self {
            shared: Mutex::new(PoolShared {
                free,
                waiters: WaitQueue::new(),
                meta,
                closed: false,
            }),
            state: AtomicUsize::new(total << Self::FREE_SHIFT),
            total,
            id,
            label,
        }
    }

    /// Returns the total number of resources the pool was built with.
    ///
    /// This never changes over the pool's lifetime, closed or not.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::new(vec!['a', 'b']).unwrap();
    /// assert_eq!(pool.size(), 2);
    /// ```
    pub fn size(&self) -> usize {
        self.total
    }

    /// Returns the number of resources that could be acquired right now.
    ///
    /// The value is a snapshot and can change before the caller acts on it.
    /// A resource in flight to a queued waiter counts as unavailable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::new(vec!['a', 'b']).unwrap();
    /// assert_eq!(pool.available(), 2);
    ///
    /// let held = pool.try_acquire().unwrap();
    /// assert_eq!(pool.available(), 1);
    /// ```
    pub fn available(&self) -> usize {
        self.state.load(Ordering::Acquire) >> Self::FREE_SHIFT
    }

    /// Returns the number of acquires currently parked in the queue.
    ///
    /// Like [`available`](Self::available) this is a snapshot, useful for
    /// diagnostics and tests rather than for control flow.
    pub fn waiting(&self) -> usize {
        self.shared.lock().unwrap().waiters.len()
    }

    /// Returns `true` if the pool has been closed.
    ///
    /// A closed pool fails all new and queued acquires; checkouts that were
    /// already granted remain valid until dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::new(vec![1]).unwrap();
    /// assert!(!pool.is_closed());
    ///
    /// pool.close();
    /// assert!(pool.is_closed());
    /// ```
    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) & Self::CLOSED == Self::CLOSED
    }

    /// Returns the diagnostic label, if one was set on the builder.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Closes the pool and fails every queued acquire.
    ///
    /// After calling this method:
    /// - queued acquires resolve with [`AcquireError`](crate::AcquireError)
    /// - future `acquire` and `try_acquire` calls fail immediately
    /// - outstanding checkouts are unaffected; their resources drain back
    ///   into the free set on release
    ///
    /// A resource that was already handed to a waiter when `close` ran stays
    /// with that waiter: the hand-off had completed, so the waiter resumes
    /// with a valid checkout.
    ///
    /// Closing an already-closed pool is a no-op.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::new(vec![1]).unwrap();
    /// pool.close();
    ///
    /// assert!(pool.is_closed());
    /// assert!(pool.try_acquire().is_err());
    /// ```
    pub fn close(&self) {
        let wakers = {
            let mut shared = self.shared.lock().unwrap();
            if shared.closed {
                return;
            }
            shared.closed = true;
            self.state.fetch_or(Self::CLOSED, Ordering::Release);
            shared.waiters.close()
        };

        tracing::debug!(pool = self.id, waiters = wakers.len(), "resource pool closed");

        // Wake after unlocking so woken tasks are not immediately blocked.
        for waker in wakers {
            waker.wake();
        }
    }

    /// Gives a resource back by claim instead of by guard drop.
    ///
    /// The claim must come from [`Checkout::into_claim`](crate::Checkout::into_claim)
    /// or its owned counterpart on this pool. On success the resource is
    /// handed to the oldest waiter or returned to the free set, exactly as a
    /// guard drop would do.
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::ForeignResource`] if the claim was minted by another
    ///   pool
    /// - [`ReleaseError::DoubleRelease`] if the claim was already settled
    ///
    /// Either way the resource is returned inside the error and the free
    /// count is left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_pool::ResourcePool;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let pool = ResourcePool::new(vec![String::from("conn")]).unwrap();
    ///
    /// let (claim, conn) = pool.acquire().await.unwrap().into_claim();
    /// assert_eq!(pool.available(), 0);
    ///
    /// pool.release(claim, conn).unwrap();
    /// assert_eq!(pool.available(), 1);
    ///
    /// // The claim has settled; replaying it is rejected.
    /// let err = pool.release(claim, String::from("conn")).unwrap_err();
    /// assert!(err.is_double_release());
    /// assert_eq!(pool.available(), 1);
    /// # }
    /// ```
    pub fn release(&self, claim: Claim, resource: R) -> Result<(), ReleaseError<R>> {
        if claim.pool_id != self.id {
            tracing::warn!(
                pool = self.id,
                claimed = claim.pool_id,
                "rejected release of a foreign resource"
            );
            return Err(ReleaseError::ForeignResource(resource));
        }

        let mut shared = self.shared.lock().unwrap();
        let meta = &shared.meta[claim.index];
        if !meta.checked_out || meta.generation != claim.generation {
            drop(shared);
            tracing::warn!(
                pool = self.id,
                slot = claim.index,
                "rejected duplicate release"
            );
            return Err(ReleaseError::DoubleRelease(resource));
        }

        let waker = self.hand_back_locked(
            &mut shared,
            Slot {
                index: claim.index,
                resource,
            },
        );
        drop(shared);

        if let Some(waker) = waker {
            waker.wake();
        }
        Ok(())
    }

    /// Pops a free slot and marks it checked out, minting its claim.
    pub(crate) fn take_free_locked(&self, shared: &mut PoolShared<R>) -> Option<(Claim, R)> {
        let Slot { index, resource } = shared.free.pop()?;
        shared.meta[index].checked_out = true;
        self.state.fetch_sub(1 << Self::FREE_SHIFT, Ordering::Release);
        Some((self.claim_for_locked(shared, index), resource))
    }

    /// Mints the claim matching the slot's current generation.
    pub(crate) fn claim_for_locked(&self, shared: &PoolShared<R>, index: usize) -> Claim {
        Claim {
            pool_id: self.id,
            index,
            generation: shared.meta[index].generation,
        }
    }

    /// Routes a returned slot: oldest live waiter first, free set otherwise.
    ///
    /// The generation bump up front invalidates any claim still floating
    /// around for the previous checkout. The returned waker, if any, must be
    /// invoked after the lock is released.
    pub(crate) fn hand_back_locked(
        &self,
        shared: &mut PoolShared<R>,
        slot: Slot<R>,
    ) -> Option<Waker> {
        let index = slot.index;
        shared.meta[index].generation = shared.meta[index].generation.wrapping_add(1);

        match shared.waiters.deliver(slot) {
            // Handed off; the slot stays checked out, now by the waiter.
            Ok(waker) => waker,
            Err(slot) => {
                shared.meta[index].checked_out = false;
                shared.free.push(slot);
                self.state.fetch_add(1 << Self::FREE_SHIFT, Ordering::Release);
                None
            }
        }
    }

    /// Lock, route, then wake outside the critical section.
    pub(crate) fn hand_back(&self, slot: Slot<R>) {
        let waker = {
            let mut shared = self.shared.lock().unwrap();
            self.hand_back_locked(&mut shared, slot)
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<R> fmt::Debug for ResourcePool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("size", &self.total)
            .field("available", &self.available())
            .field("closed", &self.is_closed())
            .field("label", &self.label)
            .finish()
    }
}
