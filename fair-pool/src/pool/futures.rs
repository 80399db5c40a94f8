use crate::error::AcquireError;
use crate::pool::checkout::{Checkout, Claim, OwnedCheckout};
use crate::pool::core::{ResourcePool, Slot};
use crate::wait_queue::WaiterState;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// A future representing an ongoing resource acquisition.
///
/// Returned by [`ResourcePool::acquire`]. Resolves to a [`Checkout`] once a
/// resource is free or handed off, or to an error once the pool is closed.
///
/// Dropping the future before completion cancels the request: a queued waiter
/// is unlinked without consuming a resource, and a resource that was already
/// handed to it is passed on to the next waiter (or freed), never lost.
///
/// # Examples
///
/// ```rust
/// use fair_pool::ResourcePool;
///
/// # #[tokio::main]
/// # async fn main() {
/// let pool = ResourcePool::new(vec![1]).unwrap();
/// let acquire_future = pool.acquire();
/// let checkout = acquire_future.await.unwrap();
/// # drop(checkout);
/// # }
/// ```
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Acquire<'a, R> {
    pub(crate) pool: &'a ResourcePool<R>,
    pub(crate) waiter: Option<Arc<WaiterState<Slot<R>>>>,
}

/// A future representing an ongoing owned resource acquisition.
///
/// Returned by [`ResourcePool::acquire_owned`]. Identical to [`Acquire`],
/// including its drop-to-cancel behavior, but resolves to an
/// [`OwnedCheckout`] that keeps the pool alive and can move across tasks.
///
/// # Examples
///
/// ```rust
/// use fair_pool::ResourcePool;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let pool = Arc::new(ResourcePool::new(vec![1]).unwrap());
/// let acquire_future = pool.clone().acquire_owned();
/// let checkout = acquire_future.await.unwrap();
/// # drop(checkout);
/// # }
/// ```
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct AcquireOwned<R> {
    pub(crate) pool: Arc<ResourcePool<R>>,
    pub(crate) waiter: Option<Arc<WaiterState<Slot<R>>>>,
}

/// Poll body shared by the borrowed and owned futures.
///
/// Everything happens under the pool mutex: the closed check, the fast path,
/// the enqueue that stores the waker, and the pickup of a delivered slot.
/// That single critical section is what rules out both the lost-wakeup race
/// (a hand-off between the free-list check and waker registration) and a
/// newcomer overtaking a parked waiter.
fn poll_acquire<R>(
    pool: &ResourcePool<R>,
    waiter: &mut Option<Arc<WaiterState<Slot<R>>>>,
    cx: &mut Context<'_>,
) -> Poll<Result<(Claim, R), AcquireError>> {
    let mut shared = pool.shared.lock().unwrap();

    match waiter {
        None => {
            if shared.closed {
                return Poll::Ready(Err(AcquireError::closed()));
            }
            if let Some(parts) = pool.take_free_locked(&mut shared) {
                return Poll::Ready(Ok(parts));
            }
            // No free slot; join the back of the queue.
            *waiter = Some(shared.waiters.push(cx.waker().clone()));
            Poll::Pending
        }
        Some(state) => {
            if state.is_delivered() {
                // The hand-off completed, so the slot is ours even if the
                // pool closed in the meantime.
                // Safety: the pool mutex is held.
                let slot = unsafe { state.take_delivery_under_lock() }.unwrap();
                let Slot { index, resource } = slot;
                let claim = pool.claim_for_locked(&shared, index);
                *waiter = None;
                return Poll::Ready(Ok((claim, resource)));
            }
            if state.is_closed() {
                *waiter = None;
                return Poll::Ready(Err(AcquireError::closed()));
            }
            // Still queued; refresh the waker.
            // Safety: the pool mutex is held.
            unsafe { state.set_waker_under_lock(cx.waker().clone()) };
            Poll::Pending
        }
    }
}

/// Drop body shared by the borrowed and owned futures.
fn drop_acquire<R>(pool: &ResourcePool<R>, waiter: &mut Option<Arc<WaiterState<Slot<R>>>>) {
    if let Some(state) = waiter.take() {
        let mut shared = pool.shared.lock().unwrap();

        if state.try_cancel() {
            // Still queued; unlink without consuming anything.
            shared.waiters.remove(&state);
            return;
        }

        if state.is_delivered() {
            // Safety: the pool mutex is held.
            if let Some(slot) = unsafe { state.take_delivery_under_lock() } {
                // A slot landed in the hand-off window but the future was
                // dropped before picking it up; pass it on so it is not lost.
                let index = slot.index;
                let waker = pool.hand_back_locked(&mut shared, slot);
                drop(shared);
                tracing::debug!(
                    pool = pool.id,
                    slot = index,
                    "cancelled acquire passed its slot on"
                );
                if let Some(waker) = waker {
                    waker.wake();
                }
            }
        }
        // A closed-out waiter holds nothing to return.
    }
}

impl<'a, R> Future for Acquire<'a, R> {
    type Output = Result<Checkout<'a, R>, AcquireError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;

        match poll_acquire(this.pool, &mut this.waiter, cx) {
            Poll::Ready(Ok(parts)) => Poll::Ready(Ok(Checkout {
                pool: this.pool,
                parts: Some(parts),
            })),
            Poll::Ready(Err(err)) => Poll::Ready(Err(err)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<R> Drop for Acquire<'_, R> {
    fn drop(&mut self) {
        drop_acquire(self.pool, &mut self.waiter);
    }
}

impl<R> Future for AcquireOwned<R> {
    type Output = Result<OwnedCheckout<R>, AcquireError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;

        match poll_acquire(&this.pool, &mut this.waiter, cx) {
            Poll::Ready(Ok(parts)) => Poll::Ready(Ok(OwnedCheckout {
                pool: Arc::clone(&this.pool),
                parts: Some(parts),
            })),
            Poll::Ready(Err(err)) => Poll::Ready(Err(err)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<R> Drop for AcquireOwned<R> {
    fn drop(&mut self) {
        drop_acquire(&self.pool, &mut self.waiter);
    }
}

// Debug implementations
impl<R> fmt::Debug for Acquire<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acquire")
            .field("queued", &self.waiter.is_some())
            .finish()
    }
}

impl<R> fmt::Debug for AcquireOwned<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcquireOwned")
            .field("queued", &self.waiter.is_some())
            .finish()
    }
}
