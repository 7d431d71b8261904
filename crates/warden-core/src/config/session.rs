//! Session management configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime when the caller does not pass one, in minutes.
    #[serde(default = "default_ttl")]
    pub default_ttl_minutes: u64,
    /// Maximum concurrent ACTIVE sessions per user. `0` means unlimited.
    #[serde(default = "default_max_sessions")]
    pub max_concurrent_sessions: u32,
    /// Strategy applied when a login would exceed the limit.
    #[serde(default)]
    pub overflow_strategy: OverflowStrategy,
    /// TTL of cached principal permission sets, in seconds.
    #[serde(default = "default_principal_ttl")]
    pub principal_cache_ttl_seconds: u64,
    /// How long INVALID/EXPIRED records are retained before purge, in hours.
    #[serde(default = "default_retention")]
    pub retention_hours: u64,
    /// Cron expression for the expiry sweep.
    #[serde(default = "default_sweep_cron")]
    pub sweep_cron: String,
    /// Cron expression for purging terminal records.
    #[serde(default = "default_purge_cron")]
    pub purge_cron: String,
}

impl SessionConfig {
    /// Default session lifetime.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_minutes * 60)
    }

    /// Principal cache TTL.
    pub fn principal_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.principal_cache_ttl_seconds)
    }

    /// Retention window for terminal records.
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours * 3600)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_ttl_minutes: default_ttl(),
            max_concurrent_sessions: default_max_sessions(),
            overflow_strategy: OverflowStrategy::default(),
            principal_cache_ttl_seconds: default_principal_ttl(),
            retention_hours: default_retention(),
            sweep_cron: default_sweep_cron(),
            purge_cron: default_purge_cron(),
        }
    }
}

/// Strategy applied when a user tries to exceed their session limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowStrategy {
    /// Reject the new login.
    Deny,
    /// Invalidate the oldest ACTIVE session to make room.
    #[default]
    KickOldest,
}

impl std::fmt::Display for OverflowStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverflowStrategy::Deny => write!(f, "deny"),
            OverflowStrategy::KickOldest => write!(f, "kick_oldest"),
        }
    }
}

fn default_ttl() -> u64 {
    120
}

fn default_max_sessions() -> u32 {
    3
}

fn default_principal_ttl() -> u64 {
    300
}

fn default_retention() -> u64 {
    72
}

fn default_sweep_cron() -> String {
    "0 */5 * * * *".to_string()
}

fn default_purge_cron() -> String {
    "0 30 3 * * *".to_string()
}
