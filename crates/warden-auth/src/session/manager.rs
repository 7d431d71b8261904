//! Session lifecycle manager: login, refresh, logout and revocation flows.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use warden_cache::keys;
use warden_core::config::{OverflowStrategy, SessionConfig};
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::SessionLimit;
use warden_database::SessionRepository;
use warden_entity::permission::Principal;
use warden_entity::session::SessionRecord;

use crate::lock::DistributedLockManager;
use crate::permission::PrincipalResolver;

use super::tokens;

/// Why a session left the ACTIVE state before its expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    /// The holder logged out.
    Logout,
    /// Evicted to make room under the concurrent session limit.
    Evicted,
    /// Revoked by the user or an administrator.
    Revoked,
}

impl InvalidationReason {
    /// The reason as persisted on the record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logout => "logout",
            Self::Evicted => "evicted: concurrent session limit",
            Self::Revoked => "revoked by user",
        }
    }
}

/// Manages the complete session lifecycle.
///
/// Create, refresh, bulk revocation and cap eviction for a user run under
/// the lease `session-lock:{user_id}`, so they are totally ordered per
/// user. Single-record transitions are conditional in the repository and
/// need no lock.
#[derive(Clone)]
pub struct SessionManager {
    /// Session persistence.
    repo: Arc<dyn SessionRepository>,
    /// Per-user lock leases.
    locks: DistributedLockManager,
    /// Principal resolution and cache.
    principals: PrincipalResolver,
    /// Session configuration.
    config: SessionConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        repo: Arc<dyn SessionRepository>,
        locks: DistributedLockManager,
        principals: PrincipalResolver,
        config: SessionConfig,
    ) -> Self {
        Self {
            repo,
            locks,
            principals,
            config,
        }
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Issue a new session for `user_id`.
    ///
    /// With `kick_oldest` the oldest ACTIVE sessions beyond the limit are
    /// invalidated before the new record is persisted. With `deny`
    /// the login fails with `CONFLICT` when the limit is already reached.
    /// A `ttl` of `None` uses the configured default.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        login_ip: &str,
        user_agent: Option<&str>,
        ttl: Option<Duration>,
    ) -> AppResult<SessionRecord> {
        let ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        self.locks
            .run_locked(
                &keys::session_lock_name(user_id),
                self.locks.default_lease(),
                self.locks.default_max_wait(),
                || self.create_locked(user_id, login_ip, user_agent, ttl),
            )
            .await
    }

    async fn create_locked(
        &self,
        user_id: Uuid,
        login_ip: &str,
        user_agent: Option<&str>,
        ttl: Duration,
    ) -> AppResult<SessionRecord> {
        let now = Utc::now();
        let expires_at = expires_after(now, ttl)?;
        let live = self.live_sessions_expiring_stale(user_id, now).await?;
        let limit = SessionLimit::from(self.config.max_concurrent_sessions);

        if self.config.overflow_strategy == OverflowStrategy::Deny && limit.is_reached_by(live.len())
        {
            warn!(
                user_id = %user_id,
                active = live.len(),
                "Login denied: concurrent session limit reached"
            );
            return Err(AppError::conflict(format!(
                "Concurrent session limit of {} reached",
                limit.as_max().unwrap_or_default()
            )));
        }

        // Evict before inserting: a failed eviction must not leave the
        // user above the limit with a record nobody holds tokens for.
        let overflow = limit.overflow(live.len() + 1);
        for victim in live.iter().take(overflow) {
            if self
                .transition_invalid(victim, InvalidationReason::Evicted, now)
                .await?
            {
                warn!(
                    user_id = %user_id,
                    session_id = %victim.id,
                    issued_at = %victim.issued_at,
                    "Evicted oldest session: concurrent session limit reached"
                );
            }
        }

        let record = SessionRecord::new(
            user_id,
            tokens::generate_pair(),
            login_ip,
            user_agent.map(str::to_string),
            now,
            expires_at,
        );
        self.repo.insert(&record).await?;

        info!(
            user_id = %user_id,
            session_id = %record.id,
            expires_at = %record.expires_at,
            "Session created"
        );
        Ok(record)
    }

    /// Exchange a refresh token for a new token pair on the same record.
    ///
    /// The presented refresh token is consumed exactly once: a concurrent
    /// or later refresh with the same token fails with `SESSION_NOT_FOUND`.
    /// A record whose expiry has passed is marked EXPIRED and the call
    /// fails with `SESSION_EXPIRED`.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        ttl: Option<Duration>,
    ) -> AppResult<SessionRecord> {
        let found = self.find_refreshable(refresh_token).await?;
        let ttl = ttl.unwrap_or_else(|| self.config.default_ttl());

        self.locks
            .run_locked(
                &keys::session_lock_name(found.user_id),
                self.locks.default_lease(),
                self.locks.default_max_wait(),
                || self.refresh_locked(refresh_token, ttl),
            )
            .await
    }

    async fn refresh_locked(&self, refresh_token: &str, ttl: Duration) -> AppResult<SessionRecord> {
        // Re-read under the lock: a racing refresh may have rotated it.
        let record = self.find_refreshable(refresh_token).await?;
        let now = Utc::now();

        if record.expires_at <= now {
            self.transition_expired(&record, now).await?;
            return Err(AppError::session_expired("Session has expired"));
        }

        let expires_at = expires_after(now, ttl)?;
        let tokens = tokens::generate_pair();
        let rotated = self
            .repo
            .rotate_tokens(record.id, refresh_token, &tokens, expires_at, now)
            .await?;
        if !rotated {
            return Err(AppError::session_not_found("Refresh token was already used"));
        }
        self.principals.evict(record.id).await;

        info!(
            user_id = %record.user_id,
            session_id = %record.id,
            "Session tokens rotated"
        );

        Ok(SessionRecord {
            session_token: tokens.session_token,
            refresh_token: tokens.refresh_token,
            expires_at,
            refreshed_at: Some(now),
            ..record
        })
    }

    async fn find_refreshable(&self, refresh_token: &str) -> AppResult<SessionRecord> {
        self.repo
            .find_by_refresh_token(refresh_token)
            .await?
            .filter(|r| !r.is_terminal())
            .ok_or_else(|| AppError::session_not_found("Refresh token is not valid"))
    }

    /// Log out the session behind `session_token`.
    ///
    /// Returns `false` if the token is unknown or the session was already
    /// terminal; neither is an error.
    pub async fn invalidate(&self, session_token: &str) -> AppResult<bool> {
        match self.repo.find_by_session_token(session_token).await? {
            Some(record) => {
                self.transition_invalid(&record, InvalidationReason::Logout, Utc::now())
                    .await
            }
            None => Ok(false),
        }
    }

    /// Revoke every ACTIVE session of `user_id`. Returns how many were revoked.
    pub async fn invalidate_all_for_user(&self, user_id: Uuid) -> AppResult<usize> {
        self.revoke_for_user(user_id, None).await
    }

    /// Revoke every ACTIVE session of `user_id` except the one holding
    /// `keep_token`. Returns how many were revoked.
    pub async fn invalidate_others_for_user(
        &self,
        user_id: Uuid,
        keep_token: &str,
    ) -> AppResult<usize> {
        self.revoke_for_user(user_id, Some(keep_token)).await
    }

    async fn revoke_for_user(&self, user_id: Uuid, keep_token: Option<&str>) -> AppResult<usize> {
        let revoked = self
            .locks
            .run_locked(
                &keys::session_lock_name(user_id),
                self.locks.default_lease(),
                self.locks.default_max_wait(),
                || async {
                    let now = Utc::now();
                    let mut revoked = 0;
                    for record in self.repo.find_active_by_user(user_id).await? {
                        if keep_token == Some(record.session_token.as_str()) {
                            continue;
                        }
                        if self
                            .transition_invalid(&record, InvalidationReason::Revoked, now)
                            .await?
                        {
                            revoked += 1;
                        }
                    }
                    Ok(revoked)
                },
            )
            .await?;

        info!(user_id = %user_id, revoked, "Revoked user sessions");
        Ok(revoked)
    }

    /// True iff the record is ACTIVE and not past its expiry.
    pub fn is_valid(&self, record: &SessionRecord) -> bool {
        record.is_valid()
    }

    /// Resolve a bearer token to its ACTIVE, unexpired record.
    ///
    /// An ACTIVE record observed past its expiry is marked EXPIRED.
    pub async fn validate(&self, session_token: &str) -> AppResult<SessionRecord> {
        let record = self
            .repo
            .find_by_session_token(session_token)
            .await?
            .filter(|r| !r.is_terminal())
            .ok_or_else(|| AppError::session_not_found("Session token is not valid"))?;

        let now = Utc::now();
        if !record.is_valid_at(now) {
            self.transition_expired(&record, now).await?;
            return Err(AppError::session_expired("Session has expired"));
        }
        Ok(record)
    }

    /// Resolve a bearer token to the principal behind it.
    pub async fn authenticate(&self, session_token: &str) -> AppResult<Principal> {
        let record = self.validate(session_token).await?;
        self.principals.resolve(&record).await
    }

    /// Currently valid sessions of `user_id`, oldest first.
    pub async fn list_sessions(&self, user_id: Uuid) -> AppResult<Vec<SessionRecord>> {
        let now = Utc::now();
        let mut active = self.repo.find_active_by_user(user_id).await?;
        active.retain(|r| r.is_valid_at(now));
        Ok(active)
    }

    /// Drop cached principals of every ACTIVE session of `user_id`, e.g.
    /// after a role change.
    pub async fn invalidate_principal_cache(&self, user_id: Uuid) -> AppResult<()> {
        for record in self.repo.find_active_by_user(user_id).await? {
            self.principals.evict(record.id).await;
        }
        Ok(())
    }

    /// Mark every ACTIVE record past its expiry as EXPIRED.
    ///
    /// Idempotent and lock-free: it only moves already stale records.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        self.repo.mark_expired(Utc::now()).await
    }

    /// Delete terminal records that left ACTIVE more than `retention` ago.
    pub async fn purge_terminated(&self, retention: Duration) -> AppResult<u64> {
        let window = TimeDelta::from_std(retention)
            .map_err(|_| AppError::validation("Retention window out of range"))?;
        self.repo.purge_terminated(Utc::now() - window).await
    }

    /// ACTIVE sessions of `user_id` that are still valid; stale ones are
    /// marked EXPIRED on the way.
    async fn live_sessions_expiring_stale(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<SessionRecord>> {
        let (live, stale): (Vec<_>, Vec<_>) = self
            .repo
            .find_active_by_user(user_id)
            .await?
            .into_iter()
            .partition(|r| r.is_valid_at(now));
        for record in &stale {
            self.transition_expired(record, now).await?;
        }
        Ok(live)
    }

    async fn transition_invalid(
        &self,
        record: &SessionRecord,
        reason: InvalidationReason,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let changed = self.repo.invalidate(record.id, reason.as_str(), now).await?;
        if changed {
            self.principals.evict(record.id).await;
            info!(
                user_id = %record.user_id,
                session_id = %record.id,
                reason = reason.as_str(),
                "Session invalidated"
            );
        }
        Ok(changed)
    }

    async fn transition_expired(&self, record: &SessionRecord, now: DateTime<Utc>) -> AppResult<()> {
        if self.repo.expire(record.id, now).await? {
            self.principals.evict(record.id).await;
            info!(user_id = %record.user_id, session_id = %record.id, "Session expired");
        }
        Ok(())
    }
}

/// Absolute expiry `ttl` after `now`.
fn expires_after(now: DateTime<Utc>, ttl: Duration) -> AppResult<DateTime<Utc>> {
    if ttl.is_zero() {
        return Err(AppError::validation("Session TTL must be positive"));
    }
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .ok_or_else(|| AppError::validation("Session TTL out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_cache::KvManager;
    use warden_core::ErrorKind;
    use warden_core::config::LockConfig;
    use warden_database::memory::{MemoryAuthorizationSource, MemorySessionRepository};
    use warden_entity::permission::PermissionSet;
    use warden_entity::session::{SessionStatus, TokenPair};

    struct Fixture {
        manager: SessionManager,
        repo: MemorySessionRepository,
        source: MemoryAuthorizationSource,
    }

    fn fixture(max: u32, strategy: OverflowStrategy) -> Fixture {
        let kv = KvManager::in_memory();
        let repo = MemorySessionRepository::new();
        let source = MemoryAuthorizationSource::new();
        let config = SessionConfig {
            max_concurrent_sessions: max,
            overflow_strategy: strategy,
            ..SessionConfig::default()
        };
        let locks = DistributedLockManager::new(kv.clone(), LockConfig::default()).unwrap();
        let principals =
            PrincipalResolver::new(Arc::new(source.clone()), kv, config.principal_cache_ttl());
        Fixture {
            manager: SessionManager::new(Arc::new(repo.clone()), locks, principals, config),
            repo,
            source,
        }
    }

    async fn login(manager: &SessionManager, user: Uuid) -> SessionRecord {
        manager
            .create_session(user, "10.0.0.1", Some("test-agent"), None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let f = fixture(3, OverflowStrategy::KickOldest);
        let user = Uuid::new_v4();
        f.source
            .grant(user, PermissionSet::new(["admin"], ["user:read"]))
            .await;

        let record = login(&f.manager, user).await;
        assert_eq!(record.status, SessionStatus::Active);
        assert!(f.manager.is_valid(&record));

        let principal = f.manager.authenticate(&record.session_token).await.unwrap();
        assert_eq!(principal.user_id, user);
        assert_eq!(principal.session_id, record.id);
        assert!(principal.resource_permissions().contains("user:read"));
    }

    #[tokio::test]
    async fn test_kick_oldest_keeps_max() {
        let f = fixture(2, OverflowStrategy::KickOldest);
        let user = Uuid::new_v4();
        let first = login(&f.manager, user).await;
        let second = login(&f.manager, user).await;
        let third = login(&f.manager, user).await;

        let live: Vec<Uuid> = f
            .manager
            .list_sessions(user)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(live, vec![second.id, third.id]);

        let evicted = f.repo.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(evicted.status, SessionStatus::Invalid);
        assert_eq!(
            evicted.invalidated_reason.as_deref(),
            Some(InvalidationReason::Evicted.as_str())
        );
    }

    #[tokio::test]
    async fn test_deny_strategy_rejects_login() {
        let f = fixture(1, OverflowStrategy::Deny);
        let user = Uuid::new_v4();
        login(&f.manager, user).await;

        let err = f
            .manager
            .create_session(user, "10.0.0.2", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(f.manager.list_sessions(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unlimited_when_zero() {
        let f = fixture(0, OverflowStrategy::KickOldest);
        let user = Uuid::new_v4();
        for _ in 0..5 {
            login(&f.manager, user).await;
        }
        assert_eq!(f.manager.list_sessions(user).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_refresh_rotates_in_place() {
        let f = fixture(3, OverflowStrategy::KickOldest);
        let original = login(&f.manager, Uuid::new_v4()).await;

        let refreshed = f
            .manager
            .refresh(&original.refresh_token, Some(Duration::from_secs(600)))
            .await
            .unwrap();
        assert_eq!(refreshed.id, original.id);
        assert_ne!(refreshed.session_token, original.session_token);
        assert_ne!(refreshed.refresh_token, original.refresh_token);

        let reused = f
            .manager
            .refresh(&original.refresh_token, None)
            .await
            .unwrap_err();
        assert_eq!(reused.kind, ErrorKind::SessionNotFound);

        let stale = f
            .manager
            .authenticate(&original.session_token)
            .await
            .unwrap_err();
        assert_eq!(stale.kind, ErrorKind::SessionNotFound);
        assert!(f.manager.validate(&refreshed.session_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_of_lapsed_session_expires_it() {
        let f = fixture(3, OverflowStrategy::KickOldest);
        let now = Utc::now();
        let lapsed = SessionRecord::new(
            Uuid::new_v4(),
            TokenPair {
                session_token: "lapsed-s".into(),
                refresh_token: "lapsed-r".into(),
            },
            "10.0.0.1",
            None,
            now - TimeDelta::hours(2),
            now - TimeDelta::hours(1),
        );
        f.repo.insert(&lapsed).await.unwrap();

        let err = f.manager.refresh("lapsed-r", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionExpired);
        let stored = f.repo.find_by_id(lapsed.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::Expired);

        let again = f.manager.refresh("lapsed-r", None).await.unwrap_err();
        assert_eq!(again.kind, ErrorKind::SessionNotFound);
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let f = fixture(3, OverflowStrategy::KickOldest);
        let record = login(&f.manager, Uuid::new_v4()).await;

        assert!(f.manager.invalidate(&record.session_token).await.unwrap());
        assert!(!f.manager.invalidate(&record.session_token).await.unwrap());
        assert!(!f.manager.invalidate("unknown").await.unwrap());

        let err = f
            .manager
            .refresh(&record.refresh_token, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionNotFound);
    }

    #[tokio::test]
    async fn test_invalidate_others_keeps_current() {
        let f = fixture(5, OverflowStrategy::KickOldest);
        let user = Uuid::new_v4();
        let keep = login(&f.manager, user).await;
        login(&f.manager, user).await;
        login(&f.manager, user).await;

        let revoked = f
            .manager
            .invalidate_others_for_user(user, &keep.session_token)
            .await
            .unwrap();
        assert_eq!(revoked, 2);
        let live = f.manager.list_sessions(user).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, keep.id);

        assert_eq!(f.manager.invalidate_all_for_user(user).await.unwrap(), 1);
        assert!(f.manager.list_sessions(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_and_purge() {
        let f = fixture(3, OverflowStrategy::KickOldest);
        let now = Utc::now();
        let lapsed = SessionRecord::new(
            Uuid::new_v4(),
            TokenPair {
                session_token: "old-s".into(),
                refresh_token: "old-r".into(),
            },
            "10.0.0.1",
            None,
            now - TimeDelta::hours(2),
            now - TimeDelta::hours(1),
        );
        f.repo.insert(&lapsed).await.unwrap();
        login(&f.manager, Uuid::new_v4()).await;

        assert_eq!(f.manager.sweep_expired().await.unwrap(), 1);
        assert_eq!(f.manager.sweep_expired().await.unwrap(), 0);

        assert_eq!(
            f.manager
                .purge_terminated(Duration::from_secs(3600))
                .await
                .unwrap(),
            0
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(f.manager.purge_terminated(Duration::ZERO).await.unwrap(), 1);
        assert_eq!(f.repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_role_change_visible_after_cache_invalidation() {
        let f = fixture(3, OverflowStrategy::KickOldest);
        let user = Uuid::new_v4();
        f.source
            .grant(user, PermissionSet::new(["viewer"], Vec::<String>::new()))
            .await;
        let record = login(&f.manager, user).await;
        f.manager.authenticate(&record.session_token).await.unwrap();

        f.source
            .grant(user, PermissionSet::new(["admin"], Vec::<String>::new()))
            .await;
        f.manager.invalidate_principal_cache(user).await.unwrap();

        let principal = f.manager.authenticate(&record.session_token).await.unwrap();
        assert!(principal.roles().contains("admin"));
    }

    /// Session store whose status transitions to INVALID always fail.
    #[derive(Debug)]
    struct RefusingInvalidations {
        inner: MemorySessionRepository,
    }

    #[async_trait::async_trait]
    impl SessionRepository for RefusingInvalidations {
        async fn insert(&self, record: &SessionRecord) -> AppResult<()> {
            self.inner.insert(record).await
        }
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SessionRecord>> {
            self.inner.find_by_id(id).await
        }
        async fn find_by_session_token(&self, token: &str) -> AppResult<Option<SessionRecord>> {
            self.inner.find_by_session_token(token).await
        }
        async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<SessionRecord>> {
            self.inner.find_by_refresh_token(token).await
        }
        async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<SessionRecord>> {
            self.inner.find_active_by_user(user_id).await
        }
        async fn rotate_tokens(
            &self,
            id: Uuid,
            expected_refresh_token: &str,
            tokens: &TokenPair,
            expires_at: DateTime<Utc>,
            refreshed_at: DateTime<Utc>,
        ) -> AppResult<bool> {
            self.inner
                .rotate_tokens(id, expected_refresh_token, tokens, expires_at, refreshed_at)
                .await
        }
        async fn invalidate(&self, _id: Uuid, _reason: &str, _at: DateTime<Utc>) -> AppResult<bool> {
            Err(AppError::database("write refused"))
        }
        async fn expire(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
            self.inner.expire(id, at).await
        }
        async fn mark_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
            self.inner.mark_expired(now).await
        }
        async fn purge_terminated(&self, before: DateTime<Utc>) -> AppResult<u64> {
            self.inner.purge_terminated(before).await
        }
    }

    #[tokio::test]
    async fn test_failed_eviction_inserts_nothing() {
        let kv = KvManager::in_memory();
        let inner = MemorySessionRepository::new();
        let config = SessionConfig {
            max_concurrent_sessions: 1,
            overflow_strategy: OverflowStrategy::KickOldest,
            ..SessionConfig::default()
        };
        let locks = DistributedLockManager::new(kv.clone(), LockConfig::default()).unwrap();
        let principals = PrincipalResolver::new(
            Arc::new(MemoryAuthorizationSource::new()),
            kv,
            config.principal_cache_ttl(),
        );
        let manager = SessionManager::new(
            Arc::new(RefusingInvalidations {
                inner: inner.clone(),
            }),
            locks,
            principals,
            config,
        );
        let user = Uuid::new_v4();
        let first = login(&manager, user).await;

        let err = manager
            .create_session(user, "10.0.0.2", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);

        let live = manager.list_sessions(user).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, first.id);
        assert_eq!(inner.len().await, 1);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let err = expires_after(Utc::now(), Duration::ZERO).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
