//! PostgreSQL session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::session::{SessionRecord, SessionStatus, TokenPair};

use super::db_err;
use crate::traits::SessionRepository;

/// Session records stored in the `sessions` table.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, record: &SessionRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, session_token, refresh_token, login_ip, user_agent, \
             status, issued_at, expires_at, refreshed_at, invalidated_at, invalidated_reason) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.session_token)
        .bind(&record.refresh_token)
        .bind(&record.login_ip)
        .bind(&record.user_agent)
        .bind(record.status)
        .bind(record.issued_at)
        .bind(record.expires_at)
        .bind(record.refreshed_at)
        .bind(record.invalidated_at)
        .bind(&record.invalidated_reason)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to insert session"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find session"))
    }

    async fn find_by_session_token(&self, token: &str) -> AppResult<Option<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>("SELECT * FROM sessions WHERE session_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find session by token"))
    }

    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>("SELECT * FROM sessions WHERE refresh_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find session by refresh token"))
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>(
            "SELECT * FROM sessions WHERE user_id = $1 AND status = $2 \
             ORDER BY issued_at ASC, id ASC",
        )
        .bind(user_id)
        .bind(SessionStatus::Active)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to find active sessions"))
    }

    async fn rotate_tokens(
        &self,
        id: Uuid,
        expected_refresh_token: &str,
        tokens: &TokenPair,
        expires_at: DateTime<Utc>,
        refreshed_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET session_token = $1, refresh_token = $2, expires_at = $3, \
             refreshed_at = $4 \
             WHERE id = $5 AND refresh_token = $6 AND status = $7",
        )
        .bind(&tokens.session_token)
        .bind(&tokens.refresh_token)
        .bind(expires_at)
        .bind(refreshed_at)
        .bind(id)
        .bind(expected_refresh_token)
        .bind(SessionStatus::Active)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to rotate session tokens"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn invalidate(&self, id: Uuid, reason: &str, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET status = $1, invalidated_at = $2, invalidated_reason = $3 \
             WHERE id = $4 AND status = $5",
        )
        .bind(SessionStatus::Invalid)
        .bind(at)
        .bind(reason)
        .bind(id)
        .bind(SessionStatus::Active)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to invalidate session"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn expire(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET status = $1, invalidated_at = $2, invalidated_reason = 'expired' \
             WHERE id = $3 AND status = $4",
        )
        .bind(SessionStatus::Expired)
        .bind(at)
        .bind(id)
        .bind(SessionStatus::Active)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to expire session"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn mark_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET status = $1, invalidated_at = $2, invalidated_reason = 'expired' \
             WHERE status = $3 AND expires_at <= $2",
        )
        .bind(SessionStatus::Expired)
        .bind(now)
        .bind(SessionStatus::Active)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to expire sessions"))?;
        Ok(result.rows_affected())
    }

    async fn purge_terminated(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM sessions WHERE status <> $1 AND invalidated_at < $2",
        )
        .bind(SessionStatus::Active)
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to purge terminated sessions"))?;
        Ok(result.rows_affected())
    }
}
