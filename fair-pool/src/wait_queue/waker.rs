use std::cell::UnsafeCell;
use std::task::Waker;

/// A wrapper around `Waker` that requires external synchronization.
///
/// This wrapper provides access to a `Waker` stored in an `UnsafeCell`.
/// All methods require that the caller holds the pool mutex to ensure
/// thread safety.
pub(crate) struct SafeWakerCell {
    waker: UnsafeCell<Option<Waker>>,
}

impl SafeWakerCell {
    pub(crate) fn new(waker: Waker) -> Self {
        Self {
            waker: UnsafeCell::new(Some(waker)),
        }
    }

    /// Replaces the waker in this cell.
    ///
    /// # Safety
    ///
    /// The caller must hold the pool mutex to ensure exclusive access.
    /// Multiple threads must not call this method concurrently.
    pub(crate) unsafe fn set_under_lock(&self, waker: Waker) {
        *self.waker.get() = Some(waker);
    }

    /// Takes the waker from this cell, leaving `None` in its place.
    ///
    /// # Safety
    ///
    /// The caller must hold the pool mutex to ensure exclusive access.
    /// Multiple threads must not call this method concurrently.
    pub(crate) unsafe fn take_under_lock(&self) -> Option<Waker> {
        (*self.waker.get()).take()
    }

    /// Checks if this cell contains a waker.
    ///
    /// # Safety
    ///
    /// The caller must hold the pool mutex to ensure exclusive access.
    /// Multiple threads must not call this method concurrently.
    pub(crate) unsafe fn has_waker_under_lock(&self) -> bool {
        (*self.waker.get()).is_some()
    }
}

// Safety: External mutex protection, Waker is Send + Sync
unsafe impl Send for SafeWakerCell {}
unsafe impl Sync for SafeWakerCell {}
