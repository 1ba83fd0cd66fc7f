//! Port interface for the key-value cache

use std::time::Duration;

use async_trait::async_trait;
use esignbridge_domain::Result;

/// String key-value store with optional per-entry expiry.
///
/// `ttl = None` keeps the entry until it is deleted or overwritten.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Remove `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
