//! In-memory key-value store provider.

pub mod store;

pub use store::MemoryKvStore;
