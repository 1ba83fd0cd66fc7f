//! Sign and stamp request types
//!
//! Two families live here: the inbound request accepted by the bridge
//! ([`GlobalSignRequest`]) and the payloads exchanged with the signing
//! provider (`Provider*`, `Stamp*`). Field names follow the provider's
//! snake_case wire format.

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

// =============================================================================
// Inbound request
// =============================================================================

/// Sign request submitted by a client of the bridge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSignRequest {
    #[serde(default)]
    pub entry_no: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub invoice_number: String,
    #[serde(default)]
    pub signing: bool,
    #[serde(default)]
    pub stamping: bool,
    #[serde(default)]
    pub signers: Vec<SignerRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp_positions: Option<StampPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_deadline: Option<DocumentDeadline>,
}

/// One signer of a sign request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub sign_page: u32,
    #[serde(default)]
    pub signature_positions: Option<SignaturePosition>,
    #[serde(default)]
    pub requires_otp: bool,
}

/// Where a signature is placed on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignaturePosition {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub page: u32,
}

/// Where the e-stamp is placed once signing completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StampPosition {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub page: u32,
}

/// Deadline and reminder settings forwarded to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDeadline {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub signing_deadline: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub recurring_reminder: String,
    #[serde(
        rename = "days_reminder_after_received",
        default,
        skip_serializing_if = "is_zero"
    )]
    pub days_reminder_after_receive: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Accepted values of `recurring_reminder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringReminder {
    None,
    Daily,
    ThreeDays,
    Weekly,
    Monthly,
}

impl_domain_status_conversions!(RecurringReminder {
    None => "none",
    Daily => "daily",
    ThreeDays => "three_days",
    Weekly => "weekly",
    Monthly => "monthly",
});

// =============================================================================
// Provider payloads
// =============================================================================

/// Body of `POST /documents/request_global_sign`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSignRequest {
    pub doc: String,
    pub filename: String,
    pub signers: Vec<ProviderSigner>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub callback_url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub document_deadline: Option<DocumentDeadline>,
    pub entry_no: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSigner {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone_number: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub requires_otp: bool,
    pub annotations: Vec<SignerAnnotation>,
    #[serde(skip_serializing_if = "is_zero", default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub country_code: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerAnnotation {
    pub type_of: String,
    pub signature_type: Vec<String>,
    pub page: u32,
    pub position_x: f64,
    pub position_y: f64,
    pub element_width: f64,
    pub element_height: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub auto_fields: Vec<String>,
}

/// Body of `POST /documents/stamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampRequest {
    pub doc: String,
    pub filename: String,
    pub annotations: Vec<StampAnnotation>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub callback_url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub document_deadline: Option<DocumentDeadline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampAnnotation {
    pub page: u32,
    pub position_x: f64,
    pub position_y: f64,
    pub element_width: f64,
    pub element_height: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub type_of: String,
}

// =============================================================================
// Provider responses
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalSignResponse {
    pub data: Option<GlobalSignData>,
}

/// Document created by a sign request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSignData {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: GlobalSignAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSignAttributes {
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub doc_token: String,
    #[serde(default)]
    pub doc_url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signers: Vec<SignerStatus>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub expiry_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignerStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signed_at: String,
    #[serde(default)]
    pub sequence: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StampResponse {
    pub data: Option<StampData>,
}

/// Stamp-phase document returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StampData {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: StampAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StampAttributes {
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub stamping_status: String,
    #[serde(default)]
    pub doc_url: String,
}

/// Answer of the sign-request endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSignResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub need_auth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<GlobalSignData>,
    #[serde(default)]
    pub message: String,
}
