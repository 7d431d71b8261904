//! Component wiring shared by every subcommand.

use std::sync::Arc;
use std::time::Duration;

use tracing;

use warden_auth::permission::PrincipalResolver;
use warden_auth::resource::EndpointManifest;
use warden_auth::{
    DistributedLockManager, ManifestIntrospector, PermissionEnforcer, RequirementRegistry,
    ResourceReconciler, SessionManager, SessionSweeper,
};
use warden_cache::KvManager;
use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_database::memory::{
    MemoryAuthorizationSource, MemoryResourceRepository, MemorySessionRepository,
};
use warden_database::repositories::{
    PgAuthorizationSource, PgResourceRepository, PgSessionRepository,
};
use warden_database::{AuthorizationSource, DatabasePool, ResourceRepository, SessionRepository};
use warden_worker::ReconcileJob;

/// Persistence collaborators selected by `database.backend`.
struct Repositories {
    sessions: Arc<dyn SessionRepository>,
    resources: Arc<dyn ResourceRepository>,
    authorization: Arc<dyn AuthorizationSource>,
    pool: Option<DatabasePool>,
}

impl Repositories {
    async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        match config.database.backend.as_str() {
            "memory" => {
                tracing::warn!("Using in-memory persistence; state is lost on exit");
                Ok(Self {
                    sessions: Arc::new(MemorySessionRepository::new()),
                    resources: Arc::new(MemoryResourceRepository::new()),
                    authorization: Arc::new(MemoryAuthorizationSource::new()),
                    pool: None,
                })
            }
            "postgres" => {
                let pool = DatabasePool::connect(&config.database).await?;
                let pg = pool.pool().clone();
                Ok(Self {
                    sessions: Arc::new(PgSessionRepository::new(pg.clone())),
                    resources: Arc::new(PgResourceRepository::new(pg.clone())),
                    authorization: Arc::new(PgAuthorizationSource::new(pg)),
                    pool: Some(pool),
                })
            }
            other => Err(AppError::configuration(format!(
                "Unknown database backend: '{other}'. Supported: memory, postgres"
            ))),
        }
    }
}

/// Every long-lived component of a Warden process.
#[derive(Debug)]
pub struct App {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Lock manager over the shared store.
    pub locks: DistributedLockManager,
    /// Session lifecycle manager.
    pub sessions: SessionManager,
    /// Session housekeeping passes.
    pub sweeper: SessionSweeper,
    /// Endpoint enforcement point.
    pub enforcer: PermissionEnforcer,
    /// Lock-guarded catalogue reconciliation.
    pub reconcile: ReconcileJob,
    pool: Option<DatabasePool>,
}

impl App {
    /// Connect the stores and build the components.
    pub async fn build(config: AppConfig) -> Result<Self, AppError> {
        tracing::info!(provider = %config.kv.provider, "Initializing key-value store...");
        let kv = KvManager::new(&config.kv).await?;

        tracing::info!(backend = %config.database.backend, "Initializing persistence...");
        let repos = Repositories::connect(&config).await?;

        let locks = DistributedLockManager::new(kv.clone(), config.lock.clone())?;
        let principals = PrincipalResolver::new(
            repos.authorization,
            kv.clone(),
            config.session.principal_cache_ttl(),
        );
        let sessions = SessionManager::new(
            repos.sessions,
            locks.clone(),
            principals,
            config.session.clone(),
        );
        let sweeper = SessionSweeper::new(sessions.clone(), kv);

        let manifest_path = config.reconcile.manifest_path.clone();
        let registry = match EndpointManifest::load(std::path::Path::new(&manifest_path)).await {
            Ok(manifest) => manifest.requirements(),
            Err(e) => {
                tracing::warn!(error = %e, "Endpoint manifest unavailable, no endpoint requirements registered");
                RequirementRegistry::new()
            }
        };
        tracing::info!(endpoints = registry.len(), "Endpoint requirements registered");

        let reconcile = ReconcileJob::new(
            locks.clone(),
            ResourceReconciler::new(repos.resources),
            Arc::new(ManifestIntrospector::from_path(manifest_path)),
            Duration::from_millis(config.reconcile.lock_lease_ms),
        );

        Ok(Self {
            config,
            locks,
            sessions,
            sweeper,
            enforcer: PermissionEnforcer::new(registry),
            reconcile,
            pool: repos.pool,
        })
    }

    /// Release pooled connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builds_in_memory() {
        let mut config = AppConfig::default();
        config.reconcile.manifest_path = "does/not/exist.json".into();
        let app = App::build(config).await.unwrap();
        assert!(app.enforcer.registry().is_empty());
        assert!(app.sweeper.run_sweep().await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_backend_rejected() {
        let mut config = AppConfig::default();
        config.database.backend = "sqlite".into();
        let err = App::build(config).await.unwrap_err();
        assert_eq!(err.kind, warden_core::ErrorKind::Configuration);
    }
}
