//! # warden-cache
//!
//! Key-value store implementations for Warden. Two providers:
//!
//! - **memory**: In-process store on a sharded [dashmap](https://crates.io/crates/dashmap),
//!   atomic per key, for single-node deployments and tests
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate,
//!   with Lua scripts for the compare-and-* primitives
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::KvManager;
