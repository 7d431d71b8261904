//! Scheduled maintenance for Warden.
//!
//! This crate provides:
//! - A cron scheduler driving the periodic tasks
//! - The lock-guarded reconciliation job shared by startup and the schedule

pub mod jobs;
pub mod scheduler;

pub use jobs::ReconcileJob;
pub use scheduler::CronScheduler;
