//! In-memory session repository using a Tokio mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::session::{SessionRecord, SessionStatus, TokenPair};

use crate::traits::SessionRepository;

/// Records plus the token indexes that point at them.
#[derive(Debug, Default)]
struct InnerState {
    records: HashMap<Uuid, SessionRecord>,
    by_session_token: HashMap<String, Uuid>,
    by_refresh_token: HashMap<String, Uuid>,
}

impl InnerState {
    fn unindex(&mut self, id: Uuid) {
        if let Some(record) = self.records.get(&id) {
            self.by_session_token.remove(&record.session_token);
            self.by_refresh_token.remove(&record.refresh_token);
        }
    }
}

/// In-memory session repository.
///
/// Every operation holds the state mutex for its whole duration, so the
/// conditional transitions are atomic. Suitable for single-node
/// deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionRepository {
    state: Arc<Mutex<InnerState>>,
}

impl MemorySessionRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records in any status.
    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    /// Whether the repository holds no records.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.records.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn insert(&self, record: &SessionRecord) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.records.contains_key(&record.id)
            || state.by_session_token.contains_key(&record.session_token)
            || state.by_refresh_token.contains_key(&record.refresh_token)
        {
            return Err(AppError::conflict(format!(
                "Session {} collides with an existing record",
                record.id
            )));
        }
        state
            .by_session_token
            .insert(record.session_token.clone(), record.id);
        state
            .by_refresh_token
            .insert(record.refresh_token.clone(), record.id);
        state.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SessionRecord>> {
        Ok(self.state.lock().await.records.get(&id).cloned())
    }

    async fn find_by_session_token(&self, token: &str) -> AppResult<Option<SessionRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .by_session_token
            .get(token)
            .and_then(|id| state.records.get(id))
            .cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<SessionRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .by_refresh_token
            .get(token)
            .and_then(|id| state.records.get(id))
            .cloned())
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<SessionRecord>> {
        let state = self.state.lock().await;
        let mut active: Vec<SessionRecord> = state
            .records
            .values()
            .filter(|r| r.user_id == user_id && r.status == SessionStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.issued_at.cmp(&b.issued_at).then(a.id.cmp(&b.id)));
        Ok(active)
    }

    async fn rotate_tokens(
        &self,
        id: Uuid,
        expected_refresh_token: &str,
        tokens: &TokenPair,
        expires_at: DateTime<Utc>,
        refreshed_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let current = match state.records.get(&id) {
            Some(r) if r.status == SessionStatus::Active
                && r.refresh_token == expected_refresh_token =>
            {
                r.clone()
            }
            _ => return Ok(false),
        };

        state.unindex(id);
        state
            .by_session_token
            .insert(tokens.session_token.clone(), id);
        state
            .by_refresh_token
            .insert(tokens.refresh_token.clone(), id);
        state.records.insert(
            id,
            SessionRecord {
                session_token: tokens.session_token.clone(),
                refresh_token: tokens.refresh_token.clone(),
                expires_at,
                refreshed_at: Some(refreshed_at),
                ..current
            },
        );
        Ok(true)
    }

    async fn invalidate(&self, id: Uuid, reason: &str, at: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.records.get_mut(&id) {
            Some(record) if record.status == SessionStatus::Active => {
                record.status = SessionStatus::Invalid;
                record.invalidated_at = Some(at);
                record.invalidated_reason = Some(reason.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn expire(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.records.get_mut(&id) {
            Some(record) if record.status == SessionStatus::Active => {
                record.status = SessionStatus::Expired;
                record.invalidated_at = Some(at);
                record.invalidated_reason = Some("expired".to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut expired = 0;
        for record in state.records.values_mut() {
            if record.status == SessionStatus::Active && record.expires_at <= now {
                record.status = SessionStatus::Expired;
                record.invalidated_at = Some(now);
                record.invalidated_reason = Some("expired".to_string());
                expired += 1;
            }
        }
        Ok(expired)
    }

    async fn purge_terminated(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let doomed: Vec<Uuid> = state
            .records
            .values()
            .filter(|r| r.is_terminal() && r.invalidated_at.is_some_and(|at| at < before))
            .map(|r| r.id)
            .collect();
        for id in &doomed {
            state.unindex(*id);
            state.records.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}
