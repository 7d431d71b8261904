//! PostgreSQL resource catalogue repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_entity::resource::{ResourceEntry, ResourceStatus};

use super::db_err;
use crate::traits::ResourceRepository;

/// Catalogue entries stored in the `resources` table.
#[derive(Debug, Clone)]
pub struct PgResourceRepository {
    pool: PgPool,
}

impl PgResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository for PgResourceRepository {
    async fn list_all(&self) -> AppResult<Vec<ResourceEntry>> {
        sqlx::query_as::<_, ResourceEntry>("SELECT * FROM resources ORDER BY resource_code")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list resources"))
    }

    async fn list_enabled(&self) -> AppResult<Vec<ResourceEntry>> {
        sqlx::query_as::<_, ResourceEntry>(
            "SELECT * FROM resources WHERE status = $1 ORDER BY resource_code",
        )
        .bind(ResourceStatus::Enabled)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list enabled resources"))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<ResourceEntry>> {
        sqlx::query_as::<_, ResourceEntry>("SELECT * FROM resources WHERE resource_code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find resource"))
    }

    async fn insert(&self, entry: &ResourceEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO resources (id, resource_code, resource_name, module, url, method, \
             status, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(entry.id)
        .bind(&entry.resource_code)
        .bind(&entry.resource_name)
        .bind(&entry.module)
        .bind(&entry.url)
        .bind(&entry.method)
        .bind(entry.status)
        .bind(&entry.description)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                AppError::with_source(
                    ErrorKind::Conflict,
                    format!("Resource code '{}' already exists", entry.resource_code),
                    e,
                )
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert resource", e)
            }
        })?;
        Ok(())
    }

    async fn update(&self, entry: &ResourceEntry) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE resources SET resource_name = $1, module = $2, url = $3, method = $4, \
             status = $5, description = $6, updated_at = $7 WHERE id = $8",
        )
        .bind(&entry.resource_name)
        .bind(&entry.module)
        .bind(&entry.url)
        .bind(&entry.method)
        .bind(entry.status)
        .bind(&entry.description)
        .bind(entry.updated_at)
        .bind(entry.id)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to update resource"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::new(
                ErrorKind::Database,
                format!("Resource {} does not exist", entry.id),
            ));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete resource"))?;
        Ok(result.rows_affected() > 0)
    }
}
