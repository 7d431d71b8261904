//! Distributed lock configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lease and polling settings for the distributed lock manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lease on per-user session locks and whenever a caller passes none, in milliseconds.
    #[serde(default = "default_lease")]
    pub default_lease_ms: u64,
    /// Wait budget for per-user session locks and whenever a caller passes
    /// none, in milliseconds. `0` fails fast.
    #[serde(default = "default_max_wait")]
    pub default_max_wait_ms: u64,
    /// First retry delay while polling a busy lock, in milliseconds.
    #[serde(default = "default_backoff_min")]
    pub backoff_min_ms: u64,
    /// Upper bound of the retry delay, in milliseconds.
    #[serde(default = "default_backoff_max")]
    pub backoff_max_ms: u64,
    /// Behaviour of scheduled jobs whose lock is busy: `"fail"`, `"proceed"`
    /// or `"skip"`. Session operations always fail.
    #[serde(default = "default_fail_policy")]
    pub fail_policy: String,
}

impl LockConfig {
    /// Default lease as a [`Duration`].
    pub fn default_lease(&self) -> Duration {
        Duration::from_millis(self.default_lease_ms)
    }

    /// Default wait budget as a [`Duration`].
    pub fn default_max_wait(&self) -> Duration {
        Duration::from_millis(self.default_max_wait_ms)
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            default_lease_ms: default_lease(),
            default_max_wait_ms: default_max_wait(),
            backoff_min_ms: default_backoff_min(),
            backoff_max_ms: default_backoff_max(),
            fail_policy: default_fail_policy(),
        }
    }
}

fn default_lease() -> u64 {
    10_000
}

fn default_max_wait() -> u64 {
    3_000
}

fn default_backoff_min() -> u64 {
    10
}

fn default_backoff_max() -> u64 {
    200
}

fn default_fail_policy() -> String {
    "skip".to_string()
}
