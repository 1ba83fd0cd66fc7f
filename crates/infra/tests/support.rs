#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use esignbridge_core::{SinkEvent, StatusSink};
use esignbridge_domain::{AuthMode, ClientCredentials, NewApiLog, ProviderConfig};
use esignbridge_infra::database::DbManager;
use tempfile::TempDir;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a migrated database in a fresh temp directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager =
            DbManager::new(temp_dir.path().join("esignbridge.db"), 2).expect("db manager");
        manager.run_migrations().expect("migrations should apply");
        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink that keeps every published event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().expect("sink lock").clone()
    }

    pub fn api_calls(&self) -> Vec<NewApiLog> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::ApiCall(log) => Some(log),
                SinkEvent::ErpLogEntry(_) => None,
            })
            .collect()
    }
}

impl StatusSink for RecordingSink {
    fn publish(&self, event: SinkEvent) {
        self.events.lock().expect("sink lock").push(event);
    }
}

pub fn provider_config(base_url: &str, auth_type: AuthMode) -> ProviderConfig {
    ProviderConfig {
        auth_type,
        base_url: base_url.to_string(),
        sso_base_url: base_url.to_string(),
        auth_url: format!("{base_url}/auth"),
        timeout_secs: 5,
        oauth2: ClientCredentials {
            client_id: "oauth-client".into(),
            client_secret: "oauth-secret".into(),
        },
        hmac: ClientCredentials { client_id: "hmac-client".into(), client_secret: "hmac-secret".into() },
    }
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..40 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
