//! Principal and access requirement value types.

pub mod principal;
pub mod requirement;

pub use principal::{PermissionSet, Principal};
pub use requirement::AccessRequirement;
