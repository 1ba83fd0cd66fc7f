//! Port interface for the signing provider

use async_trait::async_trait;
use esignbridge_domain::{GlobalSignData, ProviderSignRequest, Result, StampData, StampRequest};
use serde_json::Value;

/// Authenticated client for the signing provider's REST API.
///
/// `email` selects the OAuth2 token to use and is ignored in HMAC mode.
#[async_trait]
pub trait SigningProvider: Send + Sync {
    async fn request_global_sign(
        &self,
        email: &str,
        request: &ProviderSignRequest,
    ) -> Result<GlobalSignData>;

    async fn request_stamp(&self, email: &str, request: &StampRequest) -> Result<StampData>;

    /// Raw bytes behind a provider `doc_url` (path relative to the API base).
    async fn download_document(&self, email: &str, doc_url: &str) -> Result<Vec<u8>>;

    async fn profile(&self, email: &str) -> Result<Value>;

    async fn documents(&self, email: &str, page: u32, per_page: u32) -> Result<Value>;
}
