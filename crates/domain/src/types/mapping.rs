//! Correlation records kept in the key-value cache

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::signing::{DocumentDeadline, StampPosition};

/// Links a provider document ID to the local file it was created from.
///
/// Written once when a sign request is accepted. The stamp phase copies it
/// forward under the stamp document ID so the final webhook still resolves
/// the original invoice and filename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMapping {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp_positions: Option<StampPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_deadline: Option<DocumentDeadline>,
    #[serde(default)]
    pub entry_no: i64,
    #[serde(default)]
    pub signing: bool,
    #[serde(default)]
    pub stamping: bool,
}

impl DocumentMapping {
    /// Decode a cached value, accepting bare email strings written by older
    /// deployments.
    pub fn from_cache_value(raw: &str) -> Self {
        serde_json::from_str(raw)
            .unwrap_or_else(|_| Self { email: raw.to_string(), ..Self::default() })
    }

    /// Copy of this mapping re-keyed to the stamp-phase document.
    pub fn forward_to(&self, document_id: impl Into<String>) -> Self {
        Self { document_id: document_id.into(), ..self.clone() }
    }

    /// Whether a stamp request should follow a completed signature.
    pub fn wants_stamp(&self) -> bool {
        self.stamping && self.stamp_positions.is_some()
    }
}

/// Latest status snapshot of a provider document, overwritten per webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub document_id: String,
    pub email: String,
    pub invoice_number: String,
    pub filename: String,
    pub signing_status: String,
    pub stamping_status: String,
    pub doc_url: String,
    pub updated_at: DateTime<Utc>,
}

/// Folder locations configured on the ERP side.
///
/// `in` doubles as the finish location once a document is stamped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErpSetup {
    #[serde(rename = "in", default)]
    pub location_in: String,
    #[serde(rename = "process", default)]
    pub location_process: String,
    #[serde(rename = "out", default)]
    pub location_out: String,
}

impl ErpSetup {
    pub fn is_empty(&self) -> bool {
        self.location_in.is_empty()
            && self.location_process.is_empty()
            && self.location_out.is_empty()
    }
}

/// Strip the extension from a filename (`INV-1_a.pdf` becomes `INV-1_a`).
pub fn invoice_from_filename(filename: &str) -> String {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename[..idx].to_string(),
        _ => filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_email_value_decodes_as_mapping() {
        let mapping = DocumentMapping::from_cache_value("finance@example.com");
        assert_eq!(mapping.email, "finance@example.com");
        assert!(mapping.invoice_number.is_empty());
        assert!(!mapping.stamping);
    }

    #[test]
    fn forward_keeps_invoice_and_positions() {
        let original = DocumentMapping {
            document_id: "doc-1".into(),
            invoice_number: "INV-2024-001".into(),
            filename: "INV-2024-001_contract.pdf".into(),
            stamp_positions: Some(StampPosition { x: 10.0, y: 20.0, ..Default::default() }),
            stamping: true,
            signing: true,
            entry_no: 7,
            ..Default::default()
        };

        let forwarded = original.forward_to("stamp-9");
        assert_eq!(forwarded.document_id, "stamp-9");
        assert_eq!(forwarded.invoice_number, original.invoice_number);
        assert_eq!(forwarded.filename, original.filename);
        assert_eq!(forwarded.stamp_positions, original.stamp_positions);
        assert_eq!(forwarded.entry_no, 7);
    }

    #[test]
    fn erp_setup_uses_short_field_names() {
        let setup: ErpSetup =
            serde_json::from_str(r#"{"in":"/erp/in","process":"/erp/process","out":"/erp/out"}"#)
                .unwrap();
        assert_eq!(setup.location_in, "/erp/in");
        assert_eq!(setup.location_process, "/erp/process");
        assert!(!setup.is_empty());
    }

    #[test]
    fn invoice_from_filename_drops_extension_only() {
        assert_eq!(invoice_from_filename("INV-2024-001.pdf"), "INV-2024-001");
        assert_eq!(invoice_from_filename("archive.v2.pdf"), "archive.v2");
        assert_eq!(invoice_from_filename("noext"), "noext");
    }
}
