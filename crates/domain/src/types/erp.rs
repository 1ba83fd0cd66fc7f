//! ERP log entry payloads
//!
//! Field names match the OData entity sets published by the ERP, hence the
//! explicit renames.

use serde::{Deserialize, Serialize};

use super::webhook::{SigningStatus, StampingStatus};

/// Invoice log row mirrored to the ERP on every webhook delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErpLogEntry {
    /// Provider document the entry was built from; kept for logging only.
    #[serde(skip)]
    pub document_id: String,
    #[serde(rename = "Entry_No")]
    pub entry_no: i64,
    #[serde(rename = "Invoice_No")]
    pub invoice_no: String,
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "File_Path_In")]
    pub file_path_in: String,
    #[serde(rename = "File_Path_Process")]
    pub file_path_process: String,
    #[serde(rename = "File_Path_Out")]
    pub file_path_out: String,
    #[serde(rename = "Signing_Status")]
    pub signing_status: String,
    #[serde(rename = "Stamping_Status")]
    pub stamping_status: String,
    #[serde(rename = "Signer_1_Signing_Status", skip_serializing_if = "String::is_empty", default)]
    pub signer1_signing_status: String,
    #[serde(rename = "Signer_1_Signing_Date", skip_serializing_if = "String::is_empty", default)]
    pub signer1_signing_date: String,
    #[serde(rename = "Signer_2_Signing_Status", skip_serializing_if = "String::is_empty", default)]
    pub signer2_signing_status: String,
    #[serde(rename = "Signer_2_Signing_Date", skip_serializing_if = "String::is_empty", default)]
    pub signer2_signing_date: String,
    #[serde(rename = "Signer_3_Signing_Status", skip_serializing_if = "String::is_empty", default)]
    pub signer3_signing_status: String,
    #[serde(rename = "Signer_3_Signing_Date", skip_serializing_if = "String::is_empty", default)]
    pub signer3_signing_date: String,
}

impl ErpLogEntry {
    /// Record status and signed date for the signer at `index` (0-based).
    /// Indexes past the third signer are ignored.
    pub fn set_signer(&mut self, index: usize, status: String, signed_at: String) {
        let (status_slot, date_slot) = match index {
            0 => (&mut self.signer1_signing_status, &mut self.signer1_signing_date),
            1 => (&mut self.signer2_signing_status, &mut self.signer2_signing_date),
            2 => (&mut self.signer3_signing_status, &mut self.signer3_signing_date),
            _ => return,
        };
        *status_slot = status;
        *date_slot = signed_at;
    }
}

/// Summary of one outbound provider call, mirrored to the ERP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErpApiLog {
    #[serde(rename = "Status_Description")]
    pub status_description: String,
    #[serde(rename = "Date_Time")]
    pub date_time: String,
    #[serde(rename = "Invoice_No")]
    pub invoice_no: String,
    #[serde(rename = "Body")]
    pub body: String,
}

/// Label the ERP expects for a provider signing status.
///
/// Unknown values pass through unchanged.
pub fn erp_signing_label(status: &str) -> String {
    match status.parse::<SigningStatus>() {
        Ok(SigningStatus::Pending) => "Pending".to_string(),
        Ok(SigningStatus::InProgress) => "In Progress".to_string(),
        Ok(SigningStatus::Completed) => "Completed".to_string(),
        Err(_) => status.to_string(),
    }
}

/// Label the ERP expects for a provider stamping status.
pub fn erp_stamping_label(status: &str) -> String {
    match status.parse::<StampingStatus>() {
        Ok(StampingStatus::None) => "None".to_string(),
        Ok(StampingStatus::Pending) => "Pending".to_string(),
        Ok(StampingStatus::Success) => "Completed".to_string(),
        Err(_) => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(erp_signing_label("in_progress"), "In Progress");
        assert_eq!(erp_signing_label("completed"), "Completed");
        assert_eq!(erp_stamping_label("success"), "Completed");
        assert_eq!(erp_stamping_label("none"), "None");
        assert_eq!(erp_stamping_label("failed"), "failed");
    }

    #[test]
    fn empty_signer_slots_are_omitted() {
        let mut entry = ErpLogEntry { entry_no: 42, document_id: "doc-1".into(), ..Default::default() };
        entry.set_signer(0, "Completed".into(), "2024-05-01T10:00:00Z".into());
        entry.set_signer(5, "Completed".into(), "ignored".into());

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["Entry_No"], 42);
        assert_eq!(json["Signer_1_Signing_Status"], "Completed");
        assert!(json.get("Signer_2_Signing_Status").is_none());
        assert!(json.get("document_id").is_none());
    }
}
