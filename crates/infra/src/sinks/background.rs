//! Fire-and-forget delivery of sink events
//!
//! Each event runs on its own detached tokio task. Failures are logged and
//! dropped; callers never wait on or observe delivery.

use std::sync::Arc;

use esignbridge_core::{ApiLogRepository, ErpClient, SinkEvent, StatusSink};
use esignbridge_domain::{ErpApiLog, NewApiLog};
use serde_json::json;
use tokio::runtime::Handle;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct BackgroundSink {
    erp: Arc<dyn ErpClient>,
    api_logs: Arc<dyn ApiLogRepository>,
}

impl BackgroundSink {
    pub fn new(erp: Arc<dyn ErpClient>, api_logs: Arc<dyn ApiLogRepository>) -> Self {
        Self { erp, api_logs }
    }

    async fn deliver(self, event: SinkEvent) {
        match event {
            SinkEvent::ErpLogEntry(entry) => {
                if let Err(err) = self.erp.update_log_entry(&entry).await {
                    warn!(
                        document_id = %entry.document_id,
                        entry_no = entry.entry_no,
                        error = %err,
                        "Failed to mirror status to ERP"
                    );
                }
            }
            SinkEvent::ApiCall(log) => {
                match self.api_logs.save(&log).await {
                    Ok(id) => debug!(id, endpoint = %log.endpoint, "API call recorded"),
                    Err(err) => warn!(endpoint = %log.endpoint, error = %err, "Failed to save API log"),
                }
                if let Err(err) = self.erp.send_api_log(&erp_summary(&log)).await {
                    warn!(endpoint = %log.endpoint, error = %err, "Failed to send API log to ERP");
                }
            }
        }
    }
}

impl StatusSink for BackgroundSink {
    fn publish(&self, event: SinkEvent) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(kind = event.kind(), "No async runtime, dropping sink event");
            return;
        };
        runtime.spawn(self.clone().deliver(event));
    }
}

/// ERP-side summary of a provider call. Bodies stay in the local audit log.
fn erp_summary(log: &NewApiLog) -> ErpApiLog {
    let status = if log.is_success() { "SUCCESS" } else { "ERROR" };
    ErpApiLog {
        status_description: status.to_string(),
        date_time: log.created_at.to_rfc3339(),
        invoice_no: log.reference.clone().unwrap_or_else(|| log.endpoint.clone()),
        body: json!({
            "method": log.method,
            "status_code": log.status_code,
            "duration_ms": log.duration_ms,
            "requester": log.email,
        })
        .to_string(),
    }
}
