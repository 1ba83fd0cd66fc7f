//! Authorization code bookkeeping for the OAuth2 flow

use std::sync::Arc;

use esignbridge_domain::{CheckCodeResponse, EsignBridgeError, OAuthCodeRecord, Result};
use tracing::info;

use super::ports::AuthorizationCodeRepository;

pub struct OAuthCodeService {
    repository: Arc<dyn AuthorizationCodeRepository>,
    auth_url: String,
    client_id: String,
}

impl OAuthCodeService {
    pub fn new(
        repository: Arc<dyn AuthorizationCodeRepository>,
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self { repository, auth_url: auth_url.into(), client_id: client_id.into() }
    }

    /// Whether `email` has authorized the bridge; if not, where to send them.
    pub async fn check_code(&self, email: &str) -> Result<CheckCodeResponse> {
        require("email", email)?;

        let record = self.repository.find_by_email(email).await?;
        if record.is_some_and(|record| !record.code.is_empty()) {
            return Ok(CheckCodeResponse { has_code: true, redirect_url: None });
        }

        let redirect_url = self.authorization_url(email);
        info!(email, redirect_url = %redirect_url, "No OAuth code stored");
        Ok(CheckCodeResponse { has_code: false, redirect_url: Some(redirect_url) })
    }

    pub async fn save_code(&self, email: &str, code: &str) -> Result<()> {
        require("email", email)?;
        require("code", code)?;

        self.repository.save_code(email, code).await?;
        info!(email, "OAuth code saved");
        Ok(())
    }

    pub async fn code_record(&self, email: &str) -> Result<Option<OAuthCodeRecord>> {
        require("email", email)?;
        self.repository.find_by_email(email).await
    }

    /// Provider consent page; `state` carries the email back to the redirect.
    pub fn authorization_url(&self, email: &str) -> String {
        format!(
            "{}/auth?client_id={}&response_type=code&scope=esign&lang=id&state={}",
            self.auth_url.trim_end_matches('/'),
            urlencoding::encode(&self.client_id),
            urlencoding::encode(email),
        )
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EsignBridgeError::Validation(format!("{field} is required")));
    }
    Ok(())
}
