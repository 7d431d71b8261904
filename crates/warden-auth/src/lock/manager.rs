//! Named leases backed by the key-value store's atomic primitives.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use warden_cache::KvManager;
use warden_cache::keys;
use warden_core::config::LockConfig;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::kv::KvStore;
use warden_entity::lock::LockLease;

use super::policy::LockFailPolicy;

/// Proof of holding a lease. Release and extension present its owner token.
pub type LockHandle = LockLease;

/// Acquires, extends and releases named leases.
///
/// A lease is a KV key `lock:{name}` whose value is a random owner token.
/// Acquisition is set-if-absent-with-expiry; release and extension are
/// compare-and-* on the owner token, so a stale handle can never touch a
/// lease granted to someone else. Leases are never renewed automatically.
#[derive(Debug, Clone)]
pub struct DistributedLockManager {
    kv: KvManager,
    config: LockConfig,
    default_policy: LockFailPolicy,
}

impl DistributedLockManager {
    /// Create a lock manager. The configured failure policy name is
    /// resolved here, once.
    pub fn new(kv: KvManager, config: LockConfig) -> AppResult<Self> {
        let default_policy = config.fail_policy.parse()?;
        Ok(Self {
            kv,
            config,
            default_policy,
        })
    }

    /// Failure policy resolved from configuration.
    pub fn default_policy(&self) -> LockFailPolicy {
        self.default_policy
    }

    /// Lease duration used when the caller has no better estimate.
    pub fn default_lease(&self) -> Duration {
        self.config.default_lease()
    }

    /// Wait budget used when the caller has no better estimate.
    pub fn default_max_wait(&self) -> Duration {
        self.config.default_max_wait()
    }

    /// Acquire the lease on `name`, polling with backoff for up to `max_wait`.
    ///
    /// A zero `max_wait` makes exactly one attempt. Fails with
    /// `LOCK_TIMEOUT` when the lease is still held at the deadline.
    pub async fn acquire(
        &self,
        name: &str,
        lease: Duration,
        max_wait: Duration,
    ) -> AppResult<LockHandle> {
        let key = keys::lock(name);
        let owner = Uuid::new_v4().simple().to_string();
        let deadline = deadline_after(Instant::now(), max_wait);
        let mut backoff = Backoff::new(
            Duration::from_millis(self.config.backoff_min_ms),
            Duration::from_millis(self.config.backoff_max_ms),
        );
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let started = Utc::now();
            if self.kv.set_if_absent_with_expiry(&key, &owner, lease).await? {
                debug!(lock = %name, attempts, "Lock acquired");
                return Ok(LockHandle {
                    name: name.to_string(),
                    owner,
                    expires_at: expiry_after(started, lease),
                });
            }

            let now = Instant::now();
            if now >= deadline {
                debug!(lock = %name, attempts, "Lock wait budget exhausted");
                return Err(AppError::lock_timeout(format!(
                    "Lock '{name}' not acquired within {}ms",
                    max_wait.as_millis()
                )));
            }
            tokio::time::sleep(backoff.next_delay().min(deadline - now)).await;
        }
    }

    /// Single acquisition attempt; `acquire` with a zero wait budget.
    pub async fn try_acquire(&self, name: &str, lease: Duration) -> AppResult<LockHandle> {
        self.acquire(name, lease, Duration::ZERO).await
    }

    /// Release the lease if `handle` still owns it.
    ///
    /// Returns `false` when the lease had already lapsed or been taken
    /// over; that is not an error.
    pub async fn release(&self, handle: &LockHandle) -> AppResult<bool> {
        let released = self
            .kv
            .compare_and_delete(&keys::lock(&handle.name), &handle.owner)
            .await?;
        if released {
            debug!(lock = %handle.name, "Lock released");
        } else {
            debug!(lock = %handle.name, "Lease already lapsed or held by another owner");
        }
        Ok(released)
    }

    /// Reset the lease to `lease` from now if `handle` still owns it.
    ///
    /// On success the handle's `expires_at` is moved forward.
    pub async fn extend(&self, handle: &mut LockHandle, lease: Duration) -> AppResult<bool> {
        let started = Utc::now();
        let extended = self
            .kv
            .compare_and_set_expiry(&keys::lock(&handle.name), &handle.owner, lease)
            .await?;
        if extended {
            handle.expires_at = expiry_after(started, lease);
        }
        Ok(extended)
    }

    /// Current owner token of `name`, if the lease is held.
    pub async fn inspect(&self, name: &str) -> AppResult<Option<String>> {
        self.kv.get(&keys::lock(name)).await
    }

    /// Run `critical` under the lease on `name`, failing with
    /// `LOCK_TIMEOUT` if it cannot be acquired. The lease is released
    /// afterwards whether `critical` succeeded or not.
    pub async fn run_locked<F, Fut, T>(
        &self,
        name: &str,
        lease: Duration,
        max_wait: Duration,
        critical: F,
    ) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let handle = self.acquire(name, lease, max_wait).await?;
        let outcome = critical().await;
        self.release_quietly(&handle).await;
        outcome
    }

    /// Run `critical` under the lease on `name`, applying `policy` when
    /// the lease cannot be acquired in time.
    ///
    /// Returns `Ok(None)` only under [`LockFailPolicy::Skip`].
    pub async fn with_lock<F, Fut, T>(
        &self,
        name: &str,
        lease: Duration,
        max_wait: Duration,
        policy: LockFailPolicy,
        critical: F,
    ) -> AppResult<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let handle = match self.acquire(name, lease, max_wait).await {
            Ok(handle) => handle,
            Err(e) if e.kind == ErrorKind::LockTimeout => {
                return match policy {
                    LockFailPolicy::Fail => Err(e),
                    LockFailPolicy::Proceed => {
                        warn!(lock = %name, "Lock busy, proceeding without it");
                        critical().await.map(Some)
                    }
                    LockFailPolicy::Skip => {
                        info!(lock = %name, "Lock busy, skipping");
                        Ok(None)
                    }
                };
            }
            Err(e) => return Err(e),
        };

        let outcome = critical().await;
        self.release_quietly(&handle).await;
        outcome.map(Some)
    }

    async fn release_quietly(&self, handle: &LockHandle) {
        if let Err(e) = self.release(handle).await {
            warn!(lock = %handle.name, error = %e, "Failed to release lock; lease will lapse");
        }
    }
}

/// Absolute expiry `lease` after `from`, saturating on overflow.
fn expiry_after(from: DateTime<Utc>, lease: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(lease)
        .ok()
        .and_then(|d| from.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Wait deadline `max_wait` after `from`; unbounded waits end in 30 years.
fn deadline_after(from: Instant, max_wait: Duration) -> Instant {
    from.checked_add(max_wait)
        .unwrap_or_else(|| from + Duration::from_secs(86_400 * 365 * 30))
}

/// Capped exponential backoff with random jitter.
#[derive(Debug)]
struct Backoff {
    current: Duration,
    max: Duration,
}

impl Backoff {
    fn new(min: Duration, max: Duration) -> Self {
        let min = min.max(Duration::from_millis(1));
        Self {
            current: min,
            max: max.max(min),
        }
    }

    /// A delay in `[current / 2, current]`, then double `current` up to `max`.
    fn next_delay(&mut self) -> Duration {
        let ceiling = self.current;
        self.current = (self.current * 2).min(self.max);
        let ceiling_ms = u64::try_from(ceiling.as_millis()).unwrap_or(u64::MAX);
        let floor_ms = ceiling_ms / 2;
        Duration::from_millis(rand::thread_rng().gen_range(floor_ms..=ceiling_ms))
    }
}
