//! Typed access to the correlation records kept in the key-value cache
//!
//! Every record is stored as JSON without expiry. Key layout:
//!
//! | key | value |
//! |---|---|
//! | `mekari:document:{id}` | [`DocumentMapping`] |
//! | `mekari:entry_no:{n}` | [`DocumentMapping`] of the latest sign request for the entry |
//! | `mekari:document:info:{id}` | [`DocumentInfo`] |
//! | `mekari:nav_setup:{n}` | [`ErpSetup`] |

use std::sync::Arc;

use esignbridge_domain::constants::{
    DOCUMENT_INFO_PREFIX, DOCUMENT_MAPPING_PREFIX, ENTRY_MAPPING_PREFIX, ERP_SETUP_PREFIX,
};
use esignbridge_domain::{DocumentInfo, DocumentMapping, ErpSetup, EsignBridgeError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::ports::KeyValueStore;
use crate::erp::ErpClient;

#[derive(Clone)]
pub struct CorrelationCache {
    store: Arc<dyn KeyValueStore>,
}

impl CorrelationCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Underlying store, for callers that need raw keys (token caching).
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub async fn mapping(&self, document_id: &str) -> Result<Option<DocumentMapping>> {
        let raw = self.store.get(&mapping_key(document_id)).await?;
        Ok(raw.as_deref().map(DocumentMapping::from_cache_value))
    }

    pub async fn save_mapping(&self, document_id: &str, mapping: &DocumentMapping) -> Result<()> {
        self.put_json(&mapping_key(document_id), mapping).await
    }

    /// Kept for operator reprocessing; no request path calls it.
    pub async fn delete_mapping(&self, document_id: &str) -> Result<()> {
        self.store.delete(&mapping_key(document_id)).await
    }

    pub async fn mapping_by_entry(&self, entry_no: i64) -> Result<Option<DocumentMapping>> {
        self.get_json(&entry_key(entry_no)).await
    }

    pub async fn save_mapping_by_entry(&self, entry_no: i64, mapping: &DocumentMapping) -> Result<()> {
        self.put_json(&entry_key(entry_no), mapping).await
    }

    /// Last status recorded for a document. Kept for operator reprocessing;
    /// no request path calls it.
    pub async fn document_info(&self, document_id: &str) -> Result<Option<DocumentInfo>> {
        self.get_json(&format!("{DOCUMENT_INFO_PREFIX}{document_id}")).await
    }

    pub async fn save_document_info(&self, info: &DocumentInfo) -> Result<()> {
        self.put_json(&format!("{DOCUMENT_INFO_PREFIX}{}", info.document_id), info).await
    }

    pub async fn erp_setup(&self, entry_no: i64) -> Result<Option<ErpSetup>> {
        self.get_json(&setup_key(entry_no)).await
    }

    /// Cached ERP setup for `entry_no`, fetched from the ERP on first use.
    ///
    /// Once cached the setup is never refreshed. A failed cache write is
    /// logged and the fetched setup is still returned.
    pub async fn erp_setup_or_fetch(&self, entry_no: i64, erp: &dyn ErpClient) -> Result<ErpSetup> {
        match self.erp_setup(entry_no).await {
            Ok(Some(setup)) => {
                debug!(entry_no, "Using cached ERP setup");
                return Ok(setup);
            }
            Ok(None) => {}
            Err(err) => warn!(entry_no, error = %err, "Failed to read cached ERP setup"),
        }

        let setup = erp.fetch_setup().await?;
        match self.put_json(&setup_key(entry_no), &setup).await {
            Ok(()) => info!(entry_no, "ERP setup cached"),
            Err(err) => warn!(entry_no, error = %err, "Failed to cache ERP setup"),
        }
        Ok(setup)
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|err| {
                EsignBridgeError::Cache(format!("corrupt cache value at {key}: {err}"))
            }),
            None => Ok(None),
        }
    }

    async fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|err| EsignBridgeError::Internal(format!("serialize {key}: {err}")))?;
        self.store.set(key, &raw, None).await
    }
}

fn mapping_key(document_id: &str) -> String {
    format!("{DOCUMENT_MAPPING_PREFIX}{document_id}")
}

fn entry_key(entry_no: i64) -> String {
    format!("{ENTRY_MAPPING_PREFIX}{entry_no}")
}

fn setup_key(entry_no: i64) -> String {
    format!("{ERP_SETUP_PREFIX}{entry_no}")
}
