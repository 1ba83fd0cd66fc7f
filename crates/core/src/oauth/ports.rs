//! Port interface for stored authorization codes

use async_trait::async_trait;
use esignbridge_domain::{OAuthCodeRecord, Result};

#[async_trait]
pub trait AuthorizationCodeRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<OAuthCodeRecord>>;

    /// Insert or replace the code stored for `email`.
    async fn save_code(&self, email: &str, code: &str) -> Result<()>;
}
