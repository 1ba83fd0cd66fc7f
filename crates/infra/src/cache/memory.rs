//! In-memory key-value store backed by moka
//!
//! Entries carry their own time-to-live; entries written without one live
//! until evicted by capacity or deleted.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use esignbridge_core::KeyValueStore;
use esignbridge_domain::Result;
use moka::sync::Cache;
use moka::Expiry;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Option<Duration>,
}

/// Expiry policy reading the TTL stored alongside each value.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// Process-local store; contents are lost on restart.
pub struct MemoryKeyValueStore {
    entries: Cache<String, Entry>,
}

impl MemoryKeyValueStore {
    pub fn new(max_capacity: u64) -> Self {
        tracing::info!(max_capacity, "In-memory key-value store initialised");
        Self { entries: Cache::builder().max_capacity(max_capacity).expire_after(PerEntryTtl).build() }
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        self.entries.insert(key.to_string(), Entry { value: value.to_string(), ttl });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.invalidate(key);
        Ok(())
    }
}
