//! Resource catalogue reconciliation configuration.

use serde::{Deserialize, Serialize};

/// Settings for the resource reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Path to the JSON endpoint manifest produced by the build.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
    /// Whether to run one reconciliation pass at startup.
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
    /// Cron expression for recurring reconciliation. Empty disables it.
    #[serde(default = "default_cron")]
    pub cron: String,
    /// Lease held while a reconciliation pass runs, in milliseconds.
    #[serde(default = "default_lease")]
    pub lock_lease_ms: u64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            run_on_startup: true,
            cron: default_cron(),
            lock_lease_ms: default_lease(),
        }
    }
}

fn default_manifest_path() -> String {
    "config/endpoints.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cron() -> String {
    "0 0 * * * *".to_string()
}

fn default_lease() -> u64 {
    60_000
}
