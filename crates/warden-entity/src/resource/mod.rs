//! Resource catalogue entities.

pub mod model;

pub use model::{ResourceEntry, ResourceStatus, ScannedResource};
