//! In-memory resource catalogue.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::resource::{ResourceEntry, ResourceStatus};

use crate::traits::ResourceRepository;

/// In-memory resource catalogue keyed by resource code.
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceRepository {
    entries: Arc<RwLock<BTreeMap<String, ResourceEntry>>>,
}

impl MemoryResourceRepository {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalogue pre-populated with `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = ResourceEntry>) -> Self {
        let map = entries
            .into_iter()
            .map(|e| (e.resource_code.clone(), e))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl ResourceRepository for MemoryResourceRepository {
    async fn list_all(&self) -> AppResult<Vec<ResourceEntry>> {
        Ok(self.entries.read().await.values().cloned().collect())
    }

    async fn list_enabled(&self) -> AppResult<Vec<ResourceEntry>> {
        Ok(self
            .entries
            .read()
            .await
            .values()
            .filter(|e| e.status == ResourceStatus::Enabled)
            .cloned()
            .collect())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<ResourceEntry>> {
        Ok(self.entries.read().await.get(code).cloned())
    }

    async fn insert(&self, entry: &ResourceEntry) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&entry.resource_code) {
            return Err(AppError::conflict(format!(
                "Resource code '{}' already exists",
                entry.resource_code
            )));
        }
        entries.insert(entry.resource_code.clone(), entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &ResourceEntry) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        let code = entries
            .values()
            .find(|e| e.id == entry.id)
            .map(|e| e.resource_code.clone())
            .ok_or_else(|| AppError::database(format!("Resource {} does not exist", entry.id)))?;
        entries.remove(&code);
        entries.insert(entry.resource_code.clone(), entry.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.id != id);
        Ok(entries.len() < before)
    }
}
