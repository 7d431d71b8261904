//! Session record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::token::TokenPair;

/// Lifecycle status of a session record.
///
/// `Invalid` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Usable until `expires_at`.
    Active,
    /// Logged out, evicted, or revoked.
    Invalid,
    /// Marked by the expiry sweep after `expires_at` passed.
    Expired,
}

impl SessionStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The durable representation of one authenticated login.
///
/// Addressable by `session_token` and by `refresh_token`. A user may hold
/// several ACTIVE records at once, bounded by the concurrent session limit.
#[derive(Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRecord {
    /// Stable record identifier, unchanged across token rotation.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Current bearer token.
    pub session_token: String,
    /// Current single-use refresh token.
    pub refresh_token: String,
    /// Client IP at login.
    pub login_ip: String,
    /// User-Agent header at login.
    pub user_agent: Option<String>,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Login time; eviction order is by this field.
    pub issued_at: DateTime<Utc>,
    /// Absolute expiry; moved forward on refresh.
    pub expires_at: DateTime<Utc>,
    /// Last successful token rotation.
    pub refreshed_at: Option<DateTime<Utc>>,
    /// When the record left the ACTIVE state.
    pub invalidated_at: Option<DateTime<Utc>>,
    /// Why the record left the ACTIVE state.
    pub invalidated_reason: Option<String>,
}

impl SessionRecord {
    /// Build a fresh ACTIVE record.
    pub fn new(
        user_id: Uuid,
        tokens: TokenPair,
        login_ip: impl Into<String>,
        user_agent: Option<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            session_token: tokens.session_token,
            refresh_token: tokens.refresh_token,
            login_ip: login_ip.into(),
            user_agent,
            status: SessionStatus::Active,
            issued_at,
            expires_at,
            refreshed_at: None,
            invalidated_at: None,
            invalidated_reason: None,
        }
    }

    /// True iff the record is ACTIVE and `now` is before `expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SessionStatus::Active && now < self.expires_at
    }

    /// [`Self::is_valid_at`] evaluated against the current time.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Whether the record is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status != SessionStatus::Active
    }

    /// Time left before `expires_at`, or `None` if already past.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        (self.expires_at - now).to_std().ok().filter(|d| !d.is_zero())
    }

    /// The current token pair.
    pub fn tokens(&self) -> TokenPair {
        TokenPair {
            session_token: self.session_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

impl std::fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecord")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("login_ip", &self.login_ip)
            .field("status", &self.status)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
