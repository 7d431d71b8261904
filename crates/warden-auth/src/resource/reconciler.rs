//! Keeps the persisted resource catalogue in step with scanned endpoints.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_database::ResourceRepository;
use warden_entity::resource::{ResourceEntry, ScannedResource};

use super::introspector::EndpointIntrospector;

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    /// New catalogue entries.
    pub inserted: usize,
    /// Entries whose introspected fields changed.
    pub updated: usize,
    /// Orphans removed.
    pub deleted: usize,
    /// Entries already in step with the scan.
    pub unchanged: usize,
    /// Entries skipped because of an error.
    pub failed: usize,
}

impl ReconcileSummary {
    /// Number of writes the pass performed.
    pub fn changes(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

impl fmt::Display for ReconcileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inserted={} updated={} deleted={} unchanged={} failed={}",
            self.inserted, self.updated, self.deleted, self.unchanged, self.failed
        )
    }
}

#[derive(Debug)]
enum EntryOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Reconciles the catalogue against a scan.
///
/// Each entry is its own unit of work: a failing entry is logged and
/// counted, and the pass carries on. Re-running with the same scan
/// converges to the same catalogue. Callers must not run two passes
/// against the same catalogue concurrently.
#[derive(Clone)]
pub struct ResourceReconciler {
    repo: Arc<dyn ResourceRepository>,
}

impl fmt::Debug for ResourceReconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceReconciler").finish()
    }
}

impl ResourceReconciler {
    /// Creates a reconciler over the catalogue repository.
    pub fn new(repo: Arc<dyn ResourceRepository>) -> Self {
        Self { repo }
    }

    /// Scan with `introspector`, then reconcile against the result.
    pub async fn reconcile_from(
        &self,
        introspector: &dyn EndpointIntrospector,
    ) -> AppResult<ReconcileSummary> {
        let scanned = introspector.scan().await?;
        self.reconcile(&scanned).await
    }

    /// Insert unknown codes, refresh the introspected fields of known ones
    /// and delete entries the scan no longer contains.
    ///
    /// Fails only if the catalogue cannot be listed. When a code appears
    /// more than once in `scanned` the first occurrence wins and the rest
    /// count as failed.
    pub async fn reconcile(&self, scanned: &[ScannedResource]) -> AppResult<ReconcileSummary> {
        let now = Utc::now();
        let existing: BTreeMap<String, ResourceEntry> = self
            .repo
            .list_all()
            .await?
            .into_iter()
            .map(|e| (e.resource_code.clone(), e))
            .collect();

        let mut summary = ReconcileSummary::default();
        let mut seen: HashSet<&str> = HashSet::with_capacity(scanned.len());

        for candidate in scanned {
            let code = candidate.resource_code.as_str();
            if !seen.insert(code) {
                summary.failed += 1;
                warn!(
                    resource_code = %code,
                    error = %AppError::reconcile_entry_failed("duplicate resource code in scan"),
                    "Skipping scanned resource"
                );
                continue;
            }

            match self.apply(candidate, existing.get(code), now).await {
                Ok(EntryOutcome::Inserted) => summary.inserted += 1,
                Ok(EntryOutcome::Updated) => summary.updated += 1,
                Ok(EntryOutcome::Unchanged) => summary.unchanged += 1,
                Err(e) => {
                    summary.failed += 1;
                    warn!(resource_code = %code, error = %e, "Failed to reconcile resource");
                }
            }
        }

        for orphan in existing.values() {
            if seen.contains(orphan.resource_code.as_str()) {
                continue;
            }
            match self.repo.delete(orphan.id).await {
                Ok(true) => {
                    summary.deleted += 1;
                    info!(resource_code = %orphan.resource_code, "Deleted orphaned resource");
                }
                Ok(false) => {}
                Err(e) => {
                    summary.failed += 1;
                    let e = entry_failed(&orphan.resource_code, e);
                    warn!(resource_code = %orphan.resource_code, error = %e, "Failed to delete orphaned resource");
                }
            }
        }

        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            unchanged = summary.unchanged,
            failed = summary.failed,
            "Resource reconciliation completed"
        );
        Ok(summary)
    }

    async fn apply(
        &self,
        candidate: &ScannedResource,
        existing: Option<&ResourceEntry>,
        now: DateTime<Utc>,
    ) -> AppResult<EntryOutcome> {
        if candidate.resource_code.trim().is_empty() {
            return Err(AppError::reconcile_entry_failed("empty resource code"));
        }

        match existing {
            None => {
                self.repo
                    .insert(&candidate.to_entry(now))
                    .await
                    .map_err(|e| entry_failed(&candidate.resource_code, e))?;
                Ok(EntryOutcome::Inserted)
            }
            Some(entry) if candidate.matches(entry) => Ok(EntryOutcome::Unchanged),
            Some(entry) => {
                let mut entry = entry.clone();
                candidate.apply_to(&mut entry, now);
                self.repo
                    .update(&entry)
                    .await
                    .map_err(|e| entry_failed(&candidate.resource_code, e))?;
                Ok(EntryOutcome::Updated)
            }
        }
    }
}

fn entry_failed(code: &str, cause: AppError) -> AppError {
    AppError::with_source(
        ErrorKind::ReconcileEntryFailed,
        format!("Resource '{code}' could not be reconciled: {}", cause.message),
        cause,
    )
}
