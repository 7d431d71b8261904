//! Cron scheduler for periodic maintenance tasks.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use warden_auth::SessionSweeper;
use warden_core::config::{ReconcileConfig, SessionConfig};
use warden_core::error::AppError;

use crate::jobs::ReconcileJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Register every configured task
    pub async fn register_default_tasks(
        &self,
        sweeper: &SessionSweeper,
        reconcile: &ReconcileJob,
        session: &SessionConfig,
        reconcile_config: &ReconcileConfig,
    ) -> Result<(), AppError> {
        self.register_session_sweep(sweeper.clone(), &session.sweep_cron)
            .await?;
        self.register_session_purge(sweeper.clone(), &session.purge_cron)
            .await?;
        if reconcile_config.cron.trim().is_empty() {
            tracing::info!("Recurring resource reconciliation disabled");
        } else {
            self.register_reconcile(reconcile.clone(), &reconcile_config.cron)
                .await?;
        }

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Expiry sweep of lapsed ACTIVE sessions
    pub async fn register_session_sweep(
        &self,
        sweeper: SessionSweeper,
        cron: &str,
    ) -> Result<(), AppError> {
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let sweeper = sweeper.clone();
            Box::pin(async move {
                tracing::debug!("Running session expiry sweep");
                // Failures are logged by the sweeper; the next tick retries.
                let _ = sweeper.run_sweep().await;
            })
        })
        .map_err(|e| schedule_error("session_sweep", cron, e))?;

        self.add("session_sweep", job).await?;
        tracing::info!(cron = %cron, "Registered: session_sweep");
        Ok(())
    }

    /// Purge of terminal sessions past retention
    pub async fn register_session_purge(
        &self,
        sweeper: SessionSweeper,
        cron: &str,
    ) -> Result<(), AppError> {
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let sweeper = sweeper.clone();
            Box::pin(async move {
                tracing::debug!("Running terminal session purge");
                let _ = sweeper.run_purge().await;
            })
        })
        .map_err(|e| schedule_error("session_purge", cron, e))?;

        self.add("session_purge", job).await?;
        tracing::info!(cron = %cron, "Registered: session_purge");
        Ok(())
    }

    /// Recurring resource reconciliation
    pub async fn register_reconcile(&self, job: ReconcileJob, cron: &str) -> Result<(), AppError> {
        let cron_job = CronJob::new_async(cron, move |_uuid, _lock| {
            let job = job.clone();
            Box::pin(async move {
                tracing::debug!("Running scheduled resource reconciliation");
                let _ = job.run().await;
            })
        })
        .map_err(|e| schedule_error("resource_reconcile", cron, e))?;

        self.add("resource_reconcile", cron_job).await?;
        tracing::info!(cron = %cron, "Registered: resource_reconcile");
        Ok(())
    }

    async fn add(&self, name: &str, job: CronJob) -> Result<(), AppError> {
        self.scheduler
            .add(job)
            .await
            .map(|_| ())
            .map_err(|e| AppError::internal(format!("Failed to add {name} schedule: {e}")))
    }
}

fn schedule_error(name: &str, cron: &str, e: impl std::fmt::Display) -> AppError {
    AppError::configuration(format!(
        "Failed to create {name} schedule from '{cron}': {e}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use warden_auth::permission::PrincipalResolver;
    use warden_auth::resource::{EndpointManifest, ManifestIntrospector};
    use warden_auth::{DistributedLockManager, ResourceReconciler, SessionManager};
    use warden_cache::KvManager;
    use warden_core::ErrorKind;
    use warden_core::config::LockConfig;
    use warden_database::memory::{
        MemoryAuthorizationSource, MemoryResourceRepository, MemorySessionRepository,
    };

    fn fixtures() -> (SessionSweeper, ReconcileJob) {
        let kv = KvManager::in_memory();
        let locks = DistributedLockManager::new(kv.clone(), LockConfig::default()).unwrap();
        let config = SessionConfig::default();
        let principals = PrincipalResolver::new(
            Arc::new(MemoryAuthorizationSource::new()),
            kv.clone(),
            config.principal_cache_ttl(),
        );
        let manager = SessionManager::new(
            Arc::new(MemorySessionRepository::new()),
            locks.clone(),
            principals,
            config,
        );
        let job = ReconcileJob::new(
            locks,
            ResourceReconciler::new(Arc::new(MemoryResourceRepository::new())),
            Arc::new(ManifestIntrospector::from_manifest(EndpointManifest::default())),
            Duration::from_secs(30),
        );
        (SessionSweeper::new(manager, kv), job)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_registers_default_tasks() {
        let (sweeper, job) = fixtures();
        let scheduler = CronScheduler::new().await.unwrap();
        scheduler
            .register_default_tasks(
                &sweeper,
                &job,
                &SessionConfig::default(),
                &ReconcileConfig::default(),
            )
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_invalid_cron_is_configuration_error() {
        let (sweeper, _) = fixtures();
        let scheduler = CronScheduler::new().await.unwrap();
        let err = scheduler
            .register_session_sweep(sweeper, "every now and then")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
