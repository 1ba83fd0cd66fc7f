//! Signing provider integration
//!
//! REST client, HMAC request signing, OAuth2 token handling and body
//! redaction for logs.

pub mod client;
pub mod hmac;
pub mod redact;
pub mod token;

pub use client::{ProviderAuth, ProviderClient};
pub use hmac::HmacSigner;
pub use token::TokenService;
