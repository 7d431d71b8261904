//! # warden-entity
//!
//! Domain entity models for Warden. Persisted entities derive
//! `sqlx::FromRow`; value objects (principals, access requirements,
//! scanned resources) are plain serde types.

pub mod lock;
pub mod permission;
pub mod resource;
pub mod session;
