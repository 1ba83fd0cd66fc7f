//! Port interface for the ERP

use async_trait::async_trait;
use esignbridge_domain::{ErpApiLog, ErpLogEntry, ErpSetup, Result};

/// Client for the ERP's OData endpoints.
#[async_trait]
pub trait ErpClient: Send + Sync {
    /// Folder setup configured in the ERP.
    ///
    /// Returns `NotFound` when the integration is disabled or the ERP has no
    /// setup row.
    async fn fetch_setup(&self) -> Result<ErpSetup>;

    /// Update the invoice log row identified by `entry.entry_no`.
    async fn update_log_entry(&self, entry: &ErpLogEntry) -> Result<()>;

    /// Append a summary of one provider call.
    async fn send_api_log(&self, log: &ErpApiLog) -> Result<()>;
}
