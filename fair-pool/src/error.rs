use std::fmt;
use thiserror::Error;

/// Error returned from acquire operations when the pool has been closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resource pool closed")]
pub struct AcquireError(());

impl AcquireError {
    pub(crate) fn closed() -> AcquireError {
        AcquireError(())
    }
}

/// Error returned from try_acquire operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryAcquireError {
    /// The pool has been closed and cannot issue new checkouts.
    #[error("resource pool closed")]
    Closed,
    /// Every resource in the pool is currently checked out.
    #[error("no free resource")]
    NoResources,
}

impl TryAcquireError {
    /// Returns `true` if the error was caused by a closed pool.
    pub fn is_closed(&self) -> bool {
        matches!(self, TryAcquireError::Closed)
    }

    /// Returns `true` if the error was caused by an exhausted pool.
    pub fn is_no_resources(&self) -> bool {
        matches!(self, TryAcquireError::NoResources)
    }
}

/// Error returned when a pool is constructed from an empty resource set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("resource pool requires at least one resource")]
pub struct EmptyPoolError;

/// Error returned from [`ResourcePool::release`](crate::ResourcePool::release)
/// when the claim does not match a live checkout.
///
/// The rejected resource rides along in the error so a failed release never
/// destroys it; recover it with [`into_inner`](ReleaseError::into_inner).
#[derive(Error)]
pub enum ReleaseError<R> {
    /// The claim was already settled by an earlier release.
    #[error("resource released twice")]
    DoubleRelease(R),
    /// The claim was minted by a different pool.
    #[error("resource belongs to a different pool")]
    ForeignResource(R),
}

impl<R> ReleaseError<R> {
    /// Returns the resource that the pool refused to take back.
    pub fn into_inner(self) -> R {
        match self {
            ReleaseError::DoubleRelease(resource) => resource,
            ReleaseError::ForeignResource(resource) => resource,
        }
    }

    /// Returns `true` if the claim was already settled.
    pub fn is_double_release(&self) -> bool {
        matches!(self, ReleaseError::DoubleRelease(_))
    }

    /// Returns `true` if the claim belongs to a different pool.
    pub fn is_foreign(&self) -> bool {
        matches!(self, ReleaseError::ForeignResource(_))
    }
}

// Manual impl so `R` does not need to be Debug.
impl<R> fmt::Debug for ReleaseError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseError::DoubleRelease(_) => f.write_str("DoubleRelease(..)"),
            ReleaseError::ForeignResource(_) => f.write_str("ForeignResource(..)"),
        }
    }
}
