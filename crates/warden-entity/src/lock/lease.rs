//! Lock lease value type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time-bounded exclusive claim on a named resource.
///
/// Holding the `owner` token is the proof of ownership; release and
/// extension must present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockLease {
    /// Logical lock name, e.g. `session-lock:{user_id}`.
    pub name: String,
    /// Opaque owner token stored as the key's value.
    pub owner: String,
    /// When the lease lapses unless extended.
    pub expires_at: DateTime<Utc>,
}

impl LockLease {
    /// Whether the lease has lapsed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
