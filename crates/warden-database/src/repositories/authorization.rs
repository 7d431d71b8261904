//! PostgreSQL authorization source over the role and grant tables.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::permission::PermissionSet;
use warden_entity::resource::ResourceStatus;

use super::db_err;
use crate::traits::AuthorizationSource;

/// Resolves permissions from `user_roles`, `roles` and `role_resources`.
///
/// Disabled roles contribute nothing; disabled resources are not granted.
#[derive(Debug, Clone)]
pub struct PgAuthorizationSource {
    pool: PgPool,
}

impl PgAuthorizationSource {
    /// Create a new authorization source.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationSource for PgAuthorizationSource {
    async fn permissions_for(&self, user_id: Uuid) -> AppResult<PermissionSet> {
        let roles: Vec<String> = sqlx::query_scalar(
            "SELECT r.role_code FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 AND r.enabled",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load user roles"))?;

        let resources: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT res.resource_code FROM resources res \
             JOIN role_resources rr ON rr.resource_id = res.id \
             JOIN roles r ON r.id = rr.role_id \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 AND r.enabled AND res.status = $2",
        )
        .bind(user_id)
        .bind(ResourceStatus::Enabled)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load resource grants"))?;

        Ok(PermissionSet::new(roles, resources))
    }
}
