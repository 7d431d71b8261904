//! Key builders for every entry Warden writes to the key-value store.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use uuid::Uuid;

/// Lock name serialising reconciliation passes across instances.
pub const RECONCILE_LOCK: &str = "resource-reconcile";

// ── Lock keys ──────────────────────────────────────────────

/// Store key holding the lease for a lock name.
pub fn lock(name: &str) -> String {
    format!("lock:{name}")
}

/// Lock name serialising session mutations for one user.
pub fn session_lock_name(user_id: Uuid) -> String {
    format!("session-lock:{user_id}")
}

// ── Principal keys ─────────────────────────────────────────

/// Cached permission set of the principal behind a session.
pub fn principal(session_id: Uuid) -> String {
    format!("principal:{session_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lock_key() {
        let user_id = Uuid::nil();
        assert_eq!(
            lock(&session_lock_name(user_id)),
            "lock:session-lock:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_principal_key() {
        let id = Uuid::nil();
        assert_eq!(
            principal(id),
            "principal:00000000-0000-0000-0000-000000000000"
        );
    }
}
