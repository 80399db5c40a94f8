//! # fair-pool
//!
//! **A fair, async resource pool with strict FIFO hand-off.**
//!
//! ## Features
//! - Strict fairness: Resources go to waiters in arrival order, with direct hand-off
//! - Value pooling: Each checkout lends out one of the pooled values, not just a counter
//! - No runtime dependency: Works with any async runtime (Tokio, async-std, smol, etc.)
//!
//! ## Quick Start
//! ```rust
//! use fair_pool::ResourcePool;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Pool two connections behind a shared handle.
//!     let pool = Arc::new(ResourcePool::new(vec!["alpha", "beta"]).unwrap());
//!
//!     // Check one out; it goes back when the guard drops.
//!     let conn = pool.clone().acquire_owned().await.unwrap();
//!     assert_eq!(pool.available(), 1);
//!
//!     drop(conn);
//!     assert_eq!(pool.available(), 2);
//! }
//! ```
//!
//! ## Limiting an async function
//!
//! Use [`LimitedExecutor`] to cap how many invocations of a work function run
//! at once:
//!
//! ```rust
//! use fair_pool::{LimitedExecutor, OwnedCheckout, ResourcePool};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = Arc::new(ResourcePool::new(vec![0u32, 1]).unwrap());
//!     let executor = LimitedExecutor::new(pool, |slot: OwnedCheckout<u32>, job: u32| async move {
//!         job * 10 + *slot
//!     });
//!
//!     // At most two of these run at a time; all four still complete.
//!     let results = futures::future::join_all((0..4).map(|job| executor.call(job))).await;
//!     assert!(results.into_iter().all(|result| result.is_ok()));
//! }
//! ```
//!
//! See the [API docs](https://docs.rs/fair-pool) for more details.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, unreachable_pub, missing_debug_implementations)]
#![deny(rust_2018_idioms)]

mod error;
mod executor;
mod pool;
mod wait_queue;

pub use error::{AcquireError, EmptyPoolError, ReleaseError, TryAcquireError};
pub use executor::LimitedExecutor;
pub use pool::{Checkout, Claim, OwnedCheckout, PoolBuilder, ResourcePool};

pub use pool::{Acquire, AcquireOwned};
