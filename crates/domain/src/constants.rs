//! Application constants
//!
//! Cache key layout, provider payload defaults and validation bounds.

// Cache keys (shared with existing deployments, do not rename)
pub const DOCUMENT_MAPPING_PREFIX: &str = "mekari:document:";
pub const DOCUMENT_INFO_PREFIX: &str = "mekari:document:info:";
pub const ENTRY_MAPPING_PREFIX: &str = "mekari:entry_no:";
pub const ERP_SETUP_PREFIX: &str = "mekari:nav_setup:";
pub const ACCESS_TOKEN_PREFIX: &str = "mekari:access_token:";
pub const REFRESH_TOKEN_PREFIX: &str = "mekari:refresh_token:";

// Webhook route exposed to the provider
pub const WEBHOOK_PATH: &str = "/webhook/mekari";

// Annotation canvas (A4 in points)
pub const CANVAS_WIDTH: f64 = 595.0;
pub const CANVAS_HEIGHT: f64 = 841.0;

// E-stamp element
pub const STAMP_ELEMENT_SIZE: f64 = 80.0;
pub const STAMP_TYPE: &str = "meterai";

pub const SIGNATURE_TYPE: &str = "signature";
pub const SIGNATURE_KINDS: [&str; 3] = ["image", "qr_code", "draw"];
pub const SIGNATURE_AUTO_FIELDS: [&str; 4] = ["date_signed", "name", "email", "company"];
pub const PHONE_COUNTRY_CODE: &str = "62";

// Deadline bounds (days)
pub const SIGNING_DEADLINE_MIN: u32 = 3;
pub const SIGNING_DEADLINE_MAX: u32 = 31;
pub const REMINDER_AFTER_RECEIVED_MIN: u32 = 1;
pub const REMINDER_AFTER_RECEIVED_MAX: u32 = 31;

// ERP mirror
pub const ERP_MAX_SIGNERS: usize = 3;
pub const ERP_EMPTY_DATE: &str = "0001-01-01T00:00:00Z";

// Log body limits
pub const LOG_BODY_LIMIT: usize = 500;
pub const AUDIT_BODY_LIMIT: usize = 10_000;
pub const BASE64_LOG_PREFIX: usize = 100;

// Access tokens expire slightly before the provider says they do
pub const ACCESS_TOKEN_SAFETY_MARGIN_SECS: i64 = 60;
