//! # warden-core
//!
//! Core crate for Warden. Contains configuration schemas, the unified
//! error system, the key-value store trait implemented by `warden-cache`,
//! and small shared value types.
//!
//! This crate has **no** internal dependencies on other Warden crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
