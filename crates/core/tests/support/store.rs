use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use esignbridge_core::KeyValueStore;
use esignbridge_domain::Result as DomainResult;

/// In-memory `KeyValueStore`. TTLs are recorded but never enforced.
#[derive(Default, Clone)]
pub struct MockKeyValueStore {
    entries: Arc<Mutex<HashMap<String, (String, Option<Duration>)>>>,
}

impl MockKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|(value, _)| value.clone())
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.to_string(), (value.to_string(), None));
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl KeyValueStore for MockKeyValueStore {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> DomainResult<()> {
        self.entries.lock().unwrap().insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> DomainResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
