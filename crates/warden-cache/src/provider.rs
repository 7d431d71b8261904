//! Key-value store manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use warden_core::config::KvConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::kv::KvStore;

/// Key-value store manager that wraps the configured provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct KvManager {
    /// The inner store.
    inner: Arc<dyn KvStore>,
}

impl KvManager {
    /// Create a new manager from configuration.
    pub async fn new(config: &KvConfig) -> AppResult<Self> {
        let inner: Arc<dyn KvStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis key-value store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisKvStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory key-value store");
                Arc::new(crate::memory::MemoryKvStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown key-value provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn KvStore>) -> Self {
        Self { inner: provider }
    }

    /// Create a manager over a fresh in-memory store.
    #[cfg(feature = "memory")]
    pub fn in_memory() -> Self {
        Self::from_provider(Arc::new(crate::memory::MemoryKvStore::new()))
    }
}

#[async_trait]
impl KvStore for KvManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        self.inner.delete(key).await
    }

    async fn set_if_absent_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> AppResult<bool> {
        self.inner.set_if_absent_with_expiry(key, value, ttl).await
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool> {
        self.inner.compare_and_delete(key, expected).await
    }

    async fn compare_and_set_expiry(
        &self,
        key: &str,
        expected: &str,
        ttl: Duration,
    ) -> AppResult<bool> {
        self.inner.compare_and_set_expiry(key, expected, ttl).await
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        self.inner.purge_expired().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = KvConfig {
            provider: "memcached".to_string(),
            ..KvConfig::default()
        };
        let err = KvManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, warden_core::ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_memory_provider_from_config() {
        let manager = KvManager::new(&KvConfig::default()).await.unwrap();
        assert!(manager.health_check().await.unwrap());
        assert!(manager
            .set_if_absent_with_expiry("k", "v", Duration::from_secs(5))
            .await
            .unwrap());
        assert_eq!(manager.get("k").await.unwrap(), Some("v".to_string()));
    }
}
