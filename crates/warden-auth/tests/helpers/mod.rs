//! Shared fixtures for warden-auth integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use warden_auth::permission::PrincipalResolver;
use warden_auth::{DistributedLockManager, ResourceReconciler, SessionManager};
use warden_cache::KvManager;
use warden_core::config::{LockConfig, OverflowStrategy, SessionConfig};
use warden_database::memory::{
    MemoryAuthorizationSource, MemoryResourceRepository, MemorySessionRepository,
};

/// Fully wired core over in-memory collaborators.
pub struct TestCore {
    pub kv: KvManager,
    pub locks: DistributedLockManager,
    pub sessions: SessionManager,
    pub session_repo: MemorySessionRepository,
    pub authz: MemoryAuthorizationSource,
    pub resources: MemoryResourceRepository,
    pub reconciler: ResourceReconciler,
}

impl TestCore {
    /// Core with a per-user limit of `max_sessions` and oldest-first eviction.
    pub fn new(max_sessions: u32) -> Self {
        Self::with_session_config(SessionConfig {
            max_concurrent_sessions: max_sessions,
            overflow_strategy: OverflowStrategy::KickOldest,
            ..SessionConfig::default()
        })
    }

    pub fn with_session_config(config: SessionConfig) -> Self {
        Self::with_configs(
            LockConfig {
                default_max_wait_ms: 10_000,
                ..LockConfig::default()
            },
            config,
        )
    }

    /// Core whose per-user session lock is never waited for.
    pub fn without_lock_wait(max_sessions: u32) -> Self {
        Self::with_configs(
            LockConfig {
                default_max_wait_ms: 0,
                ..LockConfig::default()
            },
            SessionConfig {
                max_concurrent_sessions: max_sessions,
                overflow_strategy: OverflowStrategy::KickOldest,
                ..SessionConfig::default()
            },
        )
    }

    pub fn with_configs(lock: LockConfig, config: SessionConfig) -> Self {
        let kv = KvManager::in_memory();
        let locks = DistributedLockManager::new(kv.clone(), lock)
            .expect("lock config is valid");
        let session_repo = MemorySessionRepository::new();
        let authz = MemoryAuthorizationSource::new();
        let principals = PrincipalResolver::new(
            Arc::new(authz.clone()),
            kv.clone(),
            config.principal_cache_ttl(),
        );
        let sessions = SessionManager::new(
            Arc::new(session_repo.clone()),
            locks.clone(),
            principals,
            config,
        );
        let resources = MemoryResourceRepository::new();
        let reconciler = ResourceReconciler::new(Arc::new(resources.clone()));

        Self {
            kv,
            locks,
            sessions,
            session_repo,
            authz,
            resources,
            reconciler,
        }
    }
}
