use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use esignbridge_core::ErpClient;
use esignbridge_domain::{ErpApiLog, ErpLogEntry, ErpSetup, EsignBridgeError, Result as DomainResult};

/// `ErpClient` returning a fixed setup (or `NotFound` when none is given).
#[derive(Default, Clone)]
pub struct MockErpClient {
    setup: Option<ErpSetup>,
    setup_fetches: Arc<Mutex<usize>>,
    log_entries: Arc<Mutex<Vec<ErpLogEntry>>>,
}

impl MockErpClient {
    /// ERP integration switched off.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_setup(setup: ErpSetup) -> Self {
        Self { setup: Some(setup), ..Self::default() }
    }

    pub fn setup_fetches(&self) -> usize {
        *self.setup_fetches.lock().unwrap()
    }

    pub fn log_entries(&self) -> Vec<ErpLogEntry> {
        self.log_entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ErpClient for MockErpClient {
    async fn fetch_setup(&self) -> DomainResult<ErpSetup> {
        *self.setup_fetches.lock().unwrap() += 1;
        self.setup
            .clone()
            .ok_or_else(|| EsignBridgeError::NotFound("ERP integration disabled".into()))
    }

    async fn update_log_entry(&self, entry: &ErpLogEntry) -> DomainResult<()> {
        self.log_entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn send_api_log(&self, _log: &ErpApiLog) -> DomainResult<()> {
        Ok(())
    }
}
