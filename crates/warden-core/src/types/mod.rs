//! Shared value types used across Warden crates.

pub mod session_limit;

pub use session_limit::SessionLimit;
