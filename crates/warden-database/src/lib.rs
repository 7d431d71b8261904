//! # warden-database
//!
//! Repository traits for the persistence collaborators of the
//! authorization core, with PostgreSQL implementations on sqlx and
//! in-memory implementations for single-node runs and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod traits;

pub use connection::DatabasePool;
pub use traits::{AuthorizationSource, ResourceRepository, SessionRepository};
