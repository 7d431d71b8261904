//! Resource catalogue entry and the scanned candidate it is reconciled from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Whether a catalogue entry can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Visible to permission checks.
    Enabled,
    /// Switched off by an administrator.
    Disabled,
}

/// A persisted protected endpoint that permissions may reference.
///
/// `module`, `url` and `method` come from introspection and are
/// overwritten by reconciliation. `resource_name`, `description` and
/// `status` belong to administrators and are never touched by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ResourceEntry {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Unique resource code, e.g. `user:list`.
    pub resource_code: String,
    /// Display name.
    pub resource_name: String,
    /// Owning module.
    pub module: String,
    /// Route path.
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Enabled/disabled switch.
    pub status: ResourceStatus,
    /// Free-form description.
    pub description: Option<String>,
    /// When the entry was first inserted.
    pub created_at: DateTime<Utc>,
    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

/// A protected endpoint found by introspecting the running service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedResource {
    /// Unique resource code.
    pub resource_code: String,
    /// Name used when the entry is first inserted.
    pub resource_name: String,
    /// Owning module.
    pub module: String,
    /// Route path.
    pub url: String,
    /// HTTP method.
    pub method: String,
}

impl ScannedResource {
    /// Derive a resource code as `{module}:{method}:{url}` with a lowercase method.
    pub fn derive_code(module: &str, method: &str, url: &str) -> String {
        format!("{module}:{}:{url}", method.to_lowercase())
    }

    /// Whether the introspected fields of `entry` already match this scan.
    pub fn matches(&self, entry: &ResourceEntry) -> bool {
        entry.module == self.module && entry.url == self.url && entry.method == self.method
    }

    /// Overwrite the introspected fields of `entry`, leaving administrator fields alone.
    pub fn apply_to(&self, entry: &mut ResourceEntry, now: DateTime<Utc>) {
        entry.module.clone_from(&self.module);
        entry.url.clone_from(&self.url);
        entry.method.clone_from(&self.method);
        entry.updated_at = now;
    }

    /// Build a new enabled catalogue entry with a fresh identifier.
    pub fn to_entry(&self, now: DateTime<Utc>) -> ResourceEntry {
        ResourceEntry {
            id: Uuid::new_v4(),
            resource_code: self.resource_code.clone(),
            resource_name: self.resource_name.clone(),
            module: self.module.clone(),
            url: self.url.clone(),
            method: self.method.clone(),
            status: ResourceStatus::Enabled,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}
