//! Distributed lock manager over the shared key-value store.

pub mod manager;
pub mod policy;

pub use manager::{DistributedLockManager, LockHandle};
pub use policy::LockFailPolicy;
