//! Builds the ERP invoice log entry mirrored on every webhook delivery

use esignbridge_domain::constants::{ERP_EMPTY_DATE, ERP_MAX_SIGNERS};
use esignbridge_domain::{
    erp_signing_label, erp_stamping_label, DocumentConfig, DocumentMapping, ErpLogEntry, ErpSetup,
    WebhookPayload,
};

/// Folder paths reported to the ERP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderLocations {
    pub location_in: String,
    pub location_process: String,
    pub location_out: String,
}

impl FolderLocations {
    /// Configured ready/progress/finish paths, replaced wholesale by the ERP
    /// setup when one is known.
    pub fn resolve(config: &DocumentConfig, setup: Option<&ErpSetup>) -> Self {
        match setup {
            Some(setup) => Self {
                location_in: setup.location_in.clone(),
                location_process: setup.location_process.clone(),
                location_out: setup.location_out.clone(),
            },
            None => Self {
                location_in: config.ready_path().display().to_string(),
                location_process: config.progress_path().display().to_string(),
                location_out: config.finish_path().display().to_string(),
            },
        }
    }
}

pub fn build_log_entry(
    payload: &WebhookPayload,
    mapping: &DocumentMapping,
    locations: &FolderLocations,
) -> ErpLogEntry {
    let attributes = &payload.data.attributes;
    let mut entry = ErpLogEntry {
        document_id: payload.data.id.clone(),
        entry_no: mapping.entry_no,
        invoice_no: mapping.invoice_number.clone(),
        filename: attributes.filename.clone(),
        file_path_in: locations.location_in.clone(),
        file_path_process: locations.location_process.clone(),
        file_path_out: locations.location_out.clone(),
        signing_status: erp_signing_label(&attributes.signing_status),
        stamping_status: erp_stamping_label(&attributes.stamping_status),
        ..ErpLogEntry::default()
    };

    // Signer columns are cleared once the stamp is applied.
    if entry.stamping_status != "Completed" {
        for (index, signer) in attributes.signers.iter().take(ERP_MAX_SIGNERS).enumerate() {
            let signed_at = signer.signed_at.clone().unwrap_or_else(|| ERP_EMPTY_DATE.to_string());
            entry.set_signer(index, erp_signing_label(&signer.status), signed_at);
        }
    }

    entry
}
