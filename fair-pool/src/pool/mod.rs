pub(crate) mod builder;
pub(crate) mod checkout;
pub(crate) mod core;
pub(crate) mod futures;
pub(crate) mod methods;

// Re-export main types
pub use self::builder::PoolBuilder;
pub use self::checkout::{Checkout, Claim, OwnedCheckout};
pub use self::core::ResourcePool;
pub use self::futures::{Acquire, AcquireOwned};
