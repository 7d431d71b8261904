//! Persistence collaborator traits consumed by the authorization core.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::permission::PermissionSet;
use warden_entity::resource::ResourceEntry;
use warden_entity::session::{SessionRecord, TokenPair};

/// Storage for session records.
///
/// Records are addressable by id, by current session token and by current
/// refresh token. Status transitions are conditional so that concurrent
/// callers cannot both win.
#[async_trait]
pub trait SessionRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new record.
    async fn insert(&self, record: &SessionRecord) -> AppResult<()>;

    /// Find a record by id, in any status.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SessionRecord>>;

    /// Find a record by its current session token, in any status.
    async fn find_by_session_token(&self, token: &str) -> AppResult<Option<SessionRecord>>;

    /// Find a record by its current refresh token, in any status.
    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<SessionRecord>>;

    /// ACTIVE records of a user, oldest `issued_at` first.
    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<SessionRecord>>;

    /// Replace both tokens and the expiry of an ACTIVE record, but only if
    /// its refresh token is still `expected_refresh_token`.
    ///
    /// Returns `false` when the record was already rotated or left ACTIVE.
    async fn rotate_tokens(
        &self,
        id: Uuid,
        expected_refresh_token: &str,
        tokens: &TokenPair,
        expires_at: DateTime<Utc>,
        refreshed_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Move an ACTIVE record to INVALID. Returns `false` if it was not ACTIVE.
    async fn invalidate(&self, id: Uuid, reason: &str, at: DateTime<Utc>) -> AppResult<bool>;

    /// Move one ACTIVE record to EXPIRED. Returns `false` if it was not ACTIVE.
    async fn expire(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool>;

    /// Move every ACTIVE record with `expires_at <= now` to EXPIRED.
    async fn mark_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Delete INVALID/EXPIRED records that left ACTIVE before `before`.
    async fn purge_terminated(&self, before: DateTime<Utc>) -> AppResult<u64>;
}

/// Storage for the resource catalogue.
#[async_trait]
pub trait ResourceRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Every catalogue entry.
    async fn list_all(&self) -> AppResult<Vec<ResourceEntry>>;

    /// Entries with status `enabled`.
    async fn list_enabled(&self) -> AppResult<Vec<ResourceEntry>>;

    /// Find an entry by its unique resource code.
    async fn find_by_code(&self, code: &str) -> AppResult<Option<ResourceEntry>>;

    /// Insert a new entry. Fails with `Conflict` if the code already exists.
    async fn insert(&self, entry: &ResourceEntry) -> AppResult<()>;

    /// Overwrite an existing entry by id.
    async fn update(&self, entry: &ResourceEntry) -> AppResult<()>;

    /// Delete an entry by id. Returns `true` if it existed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Resolves the roles and resource permissions granted to a user.
#[async_trait]
pub trait AuthorizationSource: Send + Sync + std::fmt::Debug + 'static {
    /// Current permission set of `user_id`; empty for unknown users.
    async fn permissions_for(&self, user_id: Uuid) -> AppResult<PermissionSet>;
}
