//! In-memory authorization source.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::permission::PermissionSet;

use crate::traits::AuthorizationSource;

/// Permission sets assigned directly per user.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthorizationSource {
    grants: Arc<RwLock<HashMap<Uuid, PermissionSet>>>,
}

impl MemoryAuthorizationSource {
    /// Create a source with no grants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the permission set of `user_id`.
    pub async fn grant(&self, user_id: Uuid, permissions: PermissionSet) {
        self.grants.write().await.insert(user_id, permissions);
    }

    /// Remove every grant of `user_id`.
    pub async fn revoke(&self, user_id: Uuid) {
        self.grants.write().await.remove(&user_id);
    }
}

#[async_trait]
impl AuthorizationSource for MemoryAuthorizationSource {
    async fn permissions_for(&self, user_id: Uuid) -> AppResult<PermissionSet> {
        Ok(self
            .grants
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}
