//! Resource catalogue reconciliation, serialised across instances.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use warden_auth::{DistributedLockManager, EndpointIntrospector, ReconcileSummary, ResourceReconciler};
use warden_cache::keys;
use warden_core::result::AppResult;

/// Runs one reconciliation pass under the cluster-wide reconcile lock.
///
/// An instance that finds the lock held never waits for it; what happens
/// next follows the lock manager's configured failure policy.
#[derive(Debug, Clone)]
pub struct ReconcileJob {
    locks: DistributedLockManager,
    reconciler: ResourceReconciler,
    introspector: Arc<dyn EndpointIntrospector>,
    lease: Duration,
}

impl ReconcileJob {
    /// Create a new reconciliation job
    pub fn new(
        locks: DistributedLockManager,
        reconciler: ResourceReconciler,
        introspector: Arc<dyn EndpointIntrospector>,
        lease: Duration,
    ) -> Self {
        Self {
            locks,
            reconciler,
            introspector,
            lease,
        }
    }

    /// Scan and reconcile. Returns `None` when another instance holds the
    /// lock and the policy is `skip`.
    pub async fn run(&self) -> AppResult<Option<ReconcileSummary>> {
        let started = Instant::now();
        let outcome = self
            .locks
            .with_lock(
                keys::RECONCILE_LOCK,
                self.lease,
                Duration::ZERO,
                self.locks.default_policy(),
                || self.reconciler.reconcile_from(self.introspector.as_ref()),
            )
            .await;

        match &outcome {
            Ok(Some(summary)) => info!(
                %summary,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Resource reconciliation pass finished"
            ),
            Ok(None) => info!("Resource reconciliation already running elsewhere, skipped"),
            Err(e) => error!(error = %e, "Resource reconciliation pass failed"),
        }
        outcome
    }
}
