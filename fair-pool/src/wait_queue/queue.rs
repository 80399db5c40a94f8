use crate::wait_queue::waiter::WaiterState;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::task::Waker;

/// FIFO queue of suspended acquires.
///
/// The queue lives inside the pool mutex, so `&mut self` here implies the
/// lock is held; that is what makes the `*_under_lock` calls on the waiter
/// cells sound.
pub(crate) struct WaitQueue<T> {
    waiters: VecDeque<Arc<WaiterState<T>>>,
}

impl<T> WaitQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            waiters: VecDeque::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.waiters.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    /// Enqueues a new waiter at the back with its waker already in place.
    pub(crate) fn push(&mut self, waker: Waker) -> Arc<WaiterState<T>> {
        let waiter = Arc::new(WaiterState::new(waker));
        self.waiters.push_back(Arc::clone(&waiter));
        waiter
    }

    /// Hands the payload to the oldest live waiter.
    ///
    /// Waiters that already left the queue state machine (dropped futures are
    /// unlinked eagerly, but a cancel can slip between two guards) are popped
    /// and skipped without disturbing the order of the rest. On success the
    /// waiter's waker is returned for the caller to invoke after unlocking.
    /// If no live waiter remains, the payload comes back in `Err`.
    pub(crate) fn deliver(&mut self, mut payload: T) -> Result<Option<Waker>, T> {
        while let Some(waiter) = self.waiters.pop_front() {
            // Safety: &mut self proves the pool mutex is held.
            match unsafe { waiter.deliver_under_lock(payload) } {
                Ok(waker) => return Ok(waker),
                Err(returned) => payload = returned,
            }
        }
        Err(payload)
    }

    /// Unlinks a cancelled waiter without touching its neighbours.
    pub(crate) fn remove(&mut self, waiter: &Arc<WaiterState<T>>) {
        if let Some(pos) = self.waiters.iter().position(|w| Arc::ptr_eq(w, waiter)) {
            self.waiters.remove(pos);
        }
    }

    /// Drains the queue, marking every still-waiting entry closed.
    ///
    /// Returns the wakers to invoke after the lock is released.
    pub(crate) fn close(&mut self) -> Vec<Waker> {
        let mut wakers = Vec::with_capacity(self.waiters.len());
        for waiter in self.waiters.drain(..) {
            // Safety: &mut self proves the pool mutex is held.
            if let Some(waker) = unsafe { waiter.close_under_lock() } {
                wakers.push(waker);
            }
        }
        wakers
    }
}

impl<T> fmt::Debug for WaitQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitQueue")
            .field("waiters", &self.waiters.len())
            .finish()
    }
}
