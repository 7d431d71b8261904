//! Session lifecycle: issue, refresh, invalidate, authenticate, sweep.

pub mod manager;
pub mod sweeper;
pub mod tokens;

pub use manager::{InvalidationReason, SessionManager};
pub use sweeper::SessionSweeper;
