//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use std::time::Duration;
use userbase_core::{Interface, UserbaseResult};

/// Cache interface for storing and retrieving cached data.
///
/// Values are JSON strings so the trait stays dyn-compatible; [`CacheExt`]
/// adds the typed layer on top.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> UserbaseResult<Option<String>>;

    /// Set a raw JSON value in the cache.
    ///
    /// `ttl` of `None` uses the adapter's default. A zero TTL stores the
    /// value without expiry. Concurrent sets of one key: last write wins.
    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> UserbaseResult<()>;

    /// Round-trips to the backend.
    async fn ping(&self) -> UserbaseResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    ///
    /// A stored value that does not decode as `T` is an error, not a miss.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> UserbaseResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> UserbaseResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

// Blanket implementation for all CacheInterface implementations
impl<T: CacheInterface + ?Sized> CacheExt for T {}
