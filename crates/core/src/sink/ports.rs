//! Port interface for fire-and-forget telemetry
//!
//! Publishing never blocks the caller and never reports failure. Events
//! carry no ordering guarantee relative to each other or to the response.

use esignbridge_domain::{ErpLogEntry, NewApiLog};

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// Status snapshot mirrored to the ERP invoice log.
    ErpLogEntry(ErpLogEntry),
    /// Outbound provider call, persisted to the audit log and summarised to
    /// the ERP.
    ApiCall(NewApiLog),
}

impl SinkEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ErpLogEntry(_) => "erp_log_entry",
            Self::ApiCall(_) => "api_call",
        }
    }
}

pub trait StatusSink: Send + Sync {
    fn publish(&self, event: SinkEvent);
}
