//! Audit log of outbound provider calls

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted record of one provider request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiLog {
    pub id: i64,
    pub endpoint: String,
    pub method: String,
    pub request_body: String,
    pub response_body: String,
    pub status_code: u16,
    pub duration_ms: i64,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Audit record before it is stored.
///
/// Bodies are expected to be redacted and truncated by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApiLog {
    pub endpoint: String,
    pub method: String,
    pub request_body: String,
    pub response_body: String,
    pub status_code: u16,
    pub duration_ms: i64,
    pub email: String,
    /// Invoice number or entry number found in the endpoint or body.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewApiLog {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
