//! Core traits defined in `warden-core` and implemented by other crates.

pub mod kv;

pub use kv::KvStore;
