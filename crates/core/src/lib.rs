//! # EsignBridge Core
//!
//! Business logic for the e-sign bridge - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the cache, document folders, signing
//!   provider, ERP, audit log and telemetry sink
//! - The webhook processor and sign request initiator
//! - Payload builders and validation
//!
//! ## Architecture Principles
//! - Only depends on `esignbridge-domain`
//! - No database, HTTP, or filesystem code
//! - All external dependencies via traits

pub mod audit;
pub mod cache;
pub mod documents;
pub mod erp;
pub mod oauth;
pub mod signing;
pub mod sink;
pub mod webhook;

pub use audit::ApiLogRepository;
pub use cache::{CorrelationCache, KeyValueStore};
pub use documents::{DocumentFolder, DocumentFolders, FolderOverrides};
pub use erp::{build_log_entry, ErpClient, FolderLocations};
pub use oauth::{AuthorizationCodeRepository, OAuthCodeService};
pub use signing::{
    validate_sign_request, SignOutcome, SignRequestInitiator, SigningProvider, StampRequester,
};
pub use sink::{SinkEvent, StatusSink};
pub use webhook::{WebhookOutcome, WebhookProcessor};
