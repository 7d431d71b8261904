//! Principal resolution with a shared permission cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use warden_cache::KvManager;
use warden_cache::keys;
use warden_core::result::AppResult;
use warden_core::traits::kv::KvStore;
use warden_database::AuthorizationSource;
use warden_entity::permission::{PermissionSet, Principal};
use warden_entity::session::SessionRecord;

/// Builds the principal behind a session.
///
/// Permission sets are cached in the key-value store under
/// `principal:{session_id}` for at most the configured TTL and never
/// beyond the session's own expiry. Cache failures degrade to a lookup
/// in the authorization source.
#[derive(Clone)]
pub struct PrincipalResolver {
    source: Arc<dyn AuthorizationSource>,
    kv: KvManager,
    cache_ttl: Duration,
}

impl std::fmt::Debug for PrincipalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalResolver")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl PrincipalResolver {
    /// Creates a resolver over an authorization source and the shared cache.
    pub fn new(source: Arc<dyn AuthorizationSource>, kv: KvManager, cache_ttl: Duration) -> Self {
        Self {
            source,
            kv,
            cache_ttl,
        }
    }

    /// Resolve the principal of a session that the caller already validated.
    pub async fn resolve(&self, record: &SessionRecord) -> AppResult<Principal> {
        let key = keys::principal(record.id);

        match self.kv.get_json::<PermissionSet>(&key).await {
            Ok(Some(permissions)) => {
                debug!(session_id = %record.id, "Principal cache hit");
                return Ok(Principal {
                    user_id: record.user_id,
                    session_id: record.id,
                    permissions,
                });
            }
            Ok(None) => {}
            Err(e) => {
                warn!(session_id = %record.id, error = %e, "Principal cache read failed");
            }
        }

        let permissions = self.source.permissions_for(record.user_id).await?;

        let ttl = record
            .remaining_at(Utc::now())
            .map(|remaining| remaining.min(self.cache_ttl));
        if let Some(ttl) = ttl.filter(|t| !t.is_zero()) {
            if let Err(e) = self.kv.set_json(&key, &permissions, ttl).await {
                warn!(session_id = %record.id, error = %e, "Principal cache write failed");
            }
        }

        Ok(Principal {
            user_id: record.user_id,
            session_id: record.id,
            permissions,
        })
    }

    /// Drop the cached permission set of a session.
    pub async fn evict(&self, session_id: Uuid) {
        if let Err(e) = self.kv.delete(&keys::principal(session_id)).await {
            warn!(session_id = %session_id, error = %e, "Failed to evict cached principal");
        }
    }
}
