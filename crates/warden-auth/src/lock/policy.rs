//! Caller-selected behaviour when a lock cannot be acquired.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use warden_core::error::AppError;

/// What a caller does when the lease is still held by someone else after
/// the wait budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockFailPolicy {
    /// Surface `LOCK_TIMEOUT` to the caller.
    #[default]
    Fail,
    /// Run the critical section without the lock.
    Proceed,
    /// Return without running the critical section.
    Skip,
}

impl FromStr for LockFailPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "proceed" => Ok(Self::Proceed),
            "skip" => Ok(Self::Skip),
            other => Err(AppError::configuration(format!(
                "Unknown lock failure policy: '{other}'. Supported: fail, proceed, skip"
            ))),
        }
    }
}

impl fmt::Display for LockFailPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Proceed => write!(f, "proceed"),
            Self::Skip => write!(f, "skip"),
        }
    }
}
