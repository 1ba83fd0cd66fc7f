//! Domain types
//!
//! Wire shapes for the signing provider and the ERP, plus the correlation
//! records the bridge keeps between a sign request and its webhooks.

pub mod audit;
pub mod erp;
pub mod mapping;
pub mod oauth;
pub mod signing;
pub mod webhook;

pub use audit::{ApiLog, NewApiLog};
pub use erp::{erp_signing_label, erp_stamping_label, ErpApiLog, ErpLogEntry};
pub use mapping::{invoice_from_filename, DocumentInfo, DocumentMapping, ErpSetup};
pub use oauth::{CheckCodeResponse, OAuthCodeRecord, TokenResponse};
pub use signing::{
    DocumentDeadline, GlobalSignAttributes, GlobalSignData, GlobalSignRequest, GlobalSignResponse,
    GlobalSignResult, PhoneNumber, ProviderSignRequest, ProviderSigner, RecurringReminder,
    SignaturePosition, SignerAnnotation, SignerRequest, SignerStatus, StampAnnotation,
    StampAttributes, StampData, StampPosition, StampRequest, StampResponse,
};
pub use webhook::{
    LifecycleState, SigningStatus, StampingStatus, WebhookAttributes, WebhookData,
    WebhookPayload, WebhookSigner,
};
