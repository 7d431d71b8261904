//! Lock lease entities.

pub mod lease;

pub use lease::LockLease;
