//! Periodic expiry sweep and retention purge of session records.

use std::time::Instant;

use tracing::{debug, error, info, warn};

use warden_cache::KvManager;
use warden_core::error::AppError;
use warden_core::traits::kv::KvStore;

use super::manager::SessionManager;

/// Runs the scheduled housekeeping passes over session records.
#[derive(Debug, Clone)]
pub struct SessionSweeper {
    manager: SessionManager,
    kv: KvManager,
}

impl SessionSweeper {
    /// Creates a sweeper driving the given session manager and the store
    /// holding its cached principals.
    pub fn new(manager: SessionManager, kv: KvManager) -> Self {
        Self { manager, kv }
    }

    /// Marks lapsed ACTIVE sessions as EXPIRED, then drops lapsed keys
    /// from the key-value store.
    ///
    /// Returns the number of sessions expired.
    pub async fn run_sweep(&self) -> Result<u64, AppError> {
        let started = Instant::now();
        let expired = match self.manager.sweep_expired().await {
            Ok(expired) => expired,
            Err(e) => {
                error!(error = %e, "Session expiry sweep failed");
                return Err(e);
            }
        };

        match self.kv.purge_expired().await {
            Ok(0) => {}
            Ok(purged) => debug!(purged, "Dropped lapsed key-value entries"),
            Err(e) => warn!(error = %e, "Key-value purge failed"),
        }

        if expired > 0 {
            info!(
                expired,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Session expiry sweep completed"
            );
        }
        Ok(expired)
    }

    /// Deletes terminal sessions older than the configured retention.
    ///
    /// Returns the number of records deleted.
    pub async fn run_purge(&self) -> Result<u64, AppError> {
        let retention = self.manager.config().retention();
        match self.manager.purge_terminated(retention).await {
            Ok(purged) => {
                if purged > 0 {
                    info!(
                        purged,
                        retention_hours = self.manager.config().retention_hours,
                        "Purged terminal sessions"
                    );
                }
                Ok(purged)
            }
            Err(e) => {
                error!(error = %e, "Terminal session purge failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use uuid::Uuid;
    use warden_cache::memory::MemoryKvStore;
    use warden_core::config::{LockConfig, SessionConfig};
    use warden_database::memory::{MemoryAuthorizationSource, MemorySessionRepository};

    use crate::lock::DistributedLockManager;
    use crate::permission::PrincipalResolver;

    #[tokio::test]
    async fn test_sweep_drops_cached_principals_of_lapsed_sessions() {
        let store = MemoryKvStore::new();
        let kv = KvManager::from_provider(Arc::new(store.clone()));
        let config = SessionConfig {
            max_concurrent_sessions: 0,
            ..SessionConfig::default()
        };
        let locks = DistributedLockManager::new(kv.clone(), LockConfig::default()).unwrap();
        let principals = PrincipalResolver::new(
            Arc::new(MemoryAuthorizationSource::new()),
            kv.clone(),
            config.principal_cache_ttl(),
        );
        let manager = SessionManager::new(
            Arc::new(MemorySessionRepository::new()),
            locks,
            principals,
            config,
        );
        let sweeper = SessionSweeper::new(manager.clone(), kv);

        for _ in 0..20 {
            let record = manager
                .create_session(
                    Uuid::new_v4(),
                    "10.0.0.1",
                    None,
                    Some(Duration::from_millis(250)),
                )
                .await
                .unwrap();
            manager.authenticate(&record.session_token).await.unwrap();
        }
        assert_eq!(store.len(), 20);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(sweeper.run_sweep().await.unwrap(), 20);
        assert!(store.is_empty());
    }
}
