//! Provider webhook payload and the lifecycle derived from it

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Status-change notification posted by the signing provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: WebhookAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookAttributes {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub doc_url: String,
    #[serde(default)]
    pub signing_status: String,
    #[serde(default)]
    pub stamping_status: String,
    #[serde(default)]
    pub type_of_meterai: String,
    #[serde(default)]
    pub signers: Vec<WebhookSigner>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookSigner {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub signed_at: Option<String>,
    #[serde(default)]
    pub signing_url: Option<String>,
    #[serde(default)]
    pub is_autosign: bool,
    #[serde(default)]
    pub phone: String,
}

/// Signing progress reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningStatus {
    Pending,
    InProgress,
    Completed,
}

impl_domain_status_conversions!(SigningStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
});

/// E-stamp progress reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampingStatus {
    None,
    Pending,
    Success,
}

impl_domain_status_conversions!(StampingStatus {
    None => "none",
    Pending => "pending",
    Success => "success",
});

/// Where a provider document stands, derived from one webhook payload.
///
/// The bridge stores no per-document state; every delivery is classified
/// from its own two status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Signing has not completed yet.
    AwaitingSignature,
    /// Signing completed and no stamp has been requested.
    Signed,
    /// Signing completed and stamping is underway or in an unrecognised state.
    StampRequested,
    /// The stamp was applied.
    Stamped,
}

impl LifecycleState {
    /// Classify a pair of raw provider statuses.
    pub fn from_statuses(signing_status: &str, stamping_status: &str) -> Self {
        let stamping = stamping_status.parse::<StampingStatus>().ok();
        if stamping == Some(StampingStatus::Success) {
            return Self::Stamped;
        }

        match signing_status.parse::<SigningStatus>() {
            Ok(SigningStatus::Completed) if stamping == Some(StampingStatus::None) => Self::Signed,
            Ok(SigningStatus::Completed) => Self::StampRequested,
            _ => Self::AwaitingSignature,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingSignature => "awaiting_signature",
            Self::Signed => "signed",
            Self::StampRequested => "stamp_requested",
            Self::Stamped => "stamped",
        }
    }
}

impl WebhookPayload {
    pub fn document_id(&self) -> &str {
        &self.data.id
    }

    pub fn lifecycle(&self) -> LifecycleState {
        LifecycleState::from_statuses(
            &self.data.attributes.signing_status,
            &self.data.attributes.stamping_status,
        )
    }
}
