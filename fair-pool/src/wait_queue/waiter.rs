use crate::wait_queue::waker::SafeWakerCell;
use std::cell::UnsafeCell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::Waker;

// Waiter state constants
const WAITING: usize = 0;
const DELIVERED: usize = 1;
const CANCELLED: usize = 2;
const CLOSED: usize = 3;

/// State for a suspended acquire waiting its turn in the queue.
///
/// Each waiter carries its own single-shot delivery cell: when a resource is
/// handed off, the payload lands in this waiter's cell and nowhere else, so a
/// second waiter can never race it away. The state machine moves exactly once
/// out of `WAITING`, to `DELIVERED` (hand-off), `CANCELLED` (future dropped)
/// or `CLOSED` (pool shut down).
pub(crate) struct WaiterState<T> {
    state: AtomicUsize,
    waker: SafeWakerCell,
    delivery: UnsafeCell<Option<T>>,
}

// Safety: the atomic carries the state; the cells are only touched while the
// pool mutex is held, and their contents are moved, never shared.
unsafe impl<T: Send> Send for WaiterState<T> {}
unsafe impl<T: Send> Sync for WaiterState<T> {}

impl<T> WaiterState<T> {
    /// Creates a waiter with its waker already registered.
    ///
    /// The waker is stored at enqueue time, under the same lock as the push,
    /// so a hand-off can never observe a queued waiter without one.
    pub(crate) fn new(waker: Waker) -> Self {
        Self {
            state: AtomicUsize::new(WAITING),
            waker: SafeWakerCell::new(waker),
            delivery: UnsafeCell::new(None),
        }
    }

    pub(crate) fn is_delivered(&self) -> bool {
        self.state.load(Ordering::Relaxed) == DELIVERED
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.load(Ordering::Relaxed) == CLOSED
    }

    /// Moves the waiter from `WAITING` to `CANCELLED`.
    ///
    /// Returns `false` if the waiter already left `WAITING`, in which case the
    /// caller must check whether a delivery needs to be recovered.
    pub(crate) fn try_cancel(&self) -> bool {
        self.state
            .compare_exchange(WAITING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Hands the payload to this waiter and takes its waker.
    ///
    /// On success the payload is parked in the delivery cell and the waker to
    /// invoke (after unlocking) is returned. If the waiter already left
    /// `WAITING`, the payload is handed back unchanged.
    ///
    /// # Safety
    ///
    /// The caller must hold the pool mutex to ensure exclusive access to the
    /// delivery and waker cells.
    pub(crate) unsafe fn deliver_under_lock(&self, payload: T) -> Result<Option<Waker>, T> {
        if self
            .state
            .compare_exchange(WAITING, DELIVERED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(payload);
        }
        *self.delivery.get() = Some(payload);
        Ok(self.waker.take_under_lock())
    }

    /// Moves the waiter from `WAITING` to `CLOSED` and takes its waker.
    ///
    /// Returns `None` if the waiter already left `WAITING`; a delivered waiter
    /// keeps its payload and completes normally.
    ///
    /// # Safety
    ///
    /// The caller must hold the pool mutex to ensure exclusive access to the
    /// waker cell.
    pub(crate) unsafe fn close_under_lock(&self) -> Option<Waker> {
        if self
            .state
            .compare_exchange(WAITING, CLOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        self.waker.take_under_lock()
    }

    /// Takes the delivered payload out of the cell.
    ///
    /// # Safety
    ///
    /// The caller must hold the pool mutex to ensure exclusive access to the
    /// delivery cell.
    pub(crate) unsafe fn take_delivery_under_lock(&self) -> Option<T> {
        (*self.delivery.get()).take()
    }

    /// Refreshes the waker on a re-poll.
    ///
    /// # Safety
    ///
    /// The caller must hold the pool mutex to ensure exclusive access to the
    /// waker cell.
    pub(crate) unsafe fn set_waker_under_lock(&self, waker: Waker) {
        self.waker.set_under_lock(waker);
    }
}

impl<T> fmt::Debug for WaiterState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Safety: only used for debugging, just checks whether the option is Some
        let has_waker = unsafe { self.waker.has_waker_under_lock() };
        f.debug_struct("WaiterState")
            .field("state", &self.state.load(Ordering::Relaxed))
            .field("has_waker", &has_waker)
            .finish()
    }
}
