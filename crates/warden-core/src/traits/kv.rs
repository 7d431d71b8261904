//! Key-value store trait backing leases and cached principals.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Shared key-value store with TTL support and atomic conditional writes.
///
/// Implementations must make `set_if_absent_with_expiry`,
/// `compare_and_delete` and `compare_and_set_expiry` atomic with respect
/// to every other operation on the same key, across all clients.
#[async_trait]
pub trait KvStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL, overwriting any existing value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Returns `true` if a live key was removed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Set a value only if the key does not already exist (NX).
    /// Returns `true` if the value was set, `false` if the key already existed.
    async fn set_if_absent_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> AppResult<bool>;

    /// Delete the key only if its current value equals `expected`.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool>;

    /// Reset the key's TTL only if its current value equals `expected`.
    async fn compare_and_set_expiry(
        &self,
        key: &str,
        expected: &str,
        ttl: Duration,
    ) -> AppResult<bool>;

    /// Get a typed value by deserializing from JSON.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> AppResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key).await? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value by serializing to JSON.
    async fn set_json<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set(key, &json, ttl).await
    }

    /// Drop values whose TTL has lapsed. Returns how many were removed.
    ///
    /// Stores that expire keys natively keep the default no-op.
    async fn purge_expired(&self) -> AppResult<u64> {
        Ok(0)
    }

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
