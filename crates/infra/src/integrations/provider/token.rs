//! OAuth2 token lifecycle for provider calls
//!
//! Tokens live in the key-value store per user email. An access token is
//! looked up in the store first, then obtained with the stored refresh
//! token, then with the authorization code saved after the consent
//! redirect.

use std::sync::Arc;
use std::time::Duration;

use esignbridge_core::{AuthorizationCodeRepository, KeyValueStore};
use esignbridge_domain::constants::{
    ACCESS_TOKEN_PREFIX, ACCESS_TOKEN_SAFETY_MARGIN_SECS, REFRESH_TOKEN_PREFIX,
};
use esignbridge_domain::{EsignBridgeError, ProviderConfig, Result, TokenResponse};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::http::HttpClient;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

pub struct TokenService {
    http: HttpClient,
    store: Arc<dyn KeyValueStore>,
    codes: Arc<dyn AuthorizationCodeRepository>,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token_ttl: Duration,
}

impl TokenService {
    pub fn new(
        http: HttpClient,
        store: Arc<dyn KeyValueStore>,
        codes: Arc<dyn AuthorizationCodeRepository>,
        provider: &ProviderConfig,
        refresh_token_age_days: u32,
    ) -> Self {
        Self {
            http,
            store,
            codes,
            token_url: format!("{}/oauth2/token", provider.sso_base_url.trim_end_matches('/')),
            client_id: provider.oauth2.client_id.clone(),
            client_secret: provider.oauth2.client_secret.clone(),
            refresh_token_ttl: Duration::from_secs(
                u64::from(refresh_token_age_days) * SECONDS_PER_DAY,
            ),
        }
    }

    /// Exchange an authorization code for tokens and store them.
    pub async fn exchange_code(&self, email: &str, code: &str) -> Result<TokenResponse> {
        info!(email, "Exchanging authorization code for tokens");

        let body = json!({
            "client_id": self.client_id,
            "client_secret": self.client_secret,
            "grant_type": "authorization_code",
            "code": code,
        });
        let tokens = self.request_token(body).await?;
        self.store_tokens(email, &tokens).await?;

        info!(email, expires_in = tokens.expires_in, "Authorization code exchanged");
        Ok(tokens)
    }

    /// Obtain fresh tokens with the stored refresh token.
    ///
    /// A rejected refresh clears both stored tokens so the next call falls
    /// back to the authorization code.
    pub async fn refresh_token(&self, email: &str) -> Result<TokenResponse> {
        let refresh_token = self.store.get(&refresh_key(email)).await?.ok_or_else(|| {
            EsignBridgeError::Auth(format!(
                "refresh token not found for {email}, re-authorization required"
            ))
        })?;

        info!(email, "Refreshing access token");
        let body = json!({
            "client_id": self.client_id,
            "client_secret": self.client_secret,
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
        });

        let tokens = match self.request_token(body).await {
            Ok(tokens) => tokens,
            Err(err) => {
                if let Err(invalidate_err) = self.invalidate(email).await {
                    warn!(email, error = %invalidate_err, "Failed to invalidate tokens");
                }
                return Err(EsignBridgeError::Auth(format!("failed to refresh token: {err}")));
            }
        };
        self.store_tokens(email, &tokens).await?;

        info!(email, expires_in = tokens.expires_in, "Access token refreshed");
        Ok(tokens)
    }

    /// Access token for `email`: cached, refreshed, or exchanged from the
    /// stored authorization code, in that order.
    pub async fn access_token(&self, email: &str) -> Result<String> {
        if let Some(token) = self.store.get(&access_key(email)).await?.filter(|t| !t.is_empty()) {
            debug!(email, "Access token found in cache");
            return Ok(token);
        }

        info!(email, "Access token not cached, attempting refresh");
        let refresh_err = match self.refresh_token(email).await {
            Ok(tokens) => return Ok(tokens.access_token),
            Err(err) => err,
        };

        info!(email, error = %refresh_err, "Refresh failed, exchanging stored authorization code");
        let record = self.codes.find_by_email(email).await?.filter(|r| !r.code.is_empty());
        let Some(record) = record else {
            return Err(EsignBridgeError::Auth(format!(
                "no authorization code found for {email}, re-authorization required"
            )));
        };

        let tokens = self.exchange_code(email, &record.code).await.map_err(|err| {
            EsignBridgeError::Auth(format!("failed to exchange code for new token: {err}"))
        })?;
        Ok(tokens.access_token)
    }

    /// Remove both stored tokens for `email`.
    pub async fn invalidate(&self, email: &str) -> Result<()> {
        self.store.delete(&access_key(email)).await?;
        self.store.delete(&refresh_key(email)).await?;
        info!(email, "Tokens invalidated");
        Ok(())
    }

    async fn request_token(&self, body: serde_json::Value) -> Result<TokenResponse> {
        debug!(url = %self.token_url, grant_type = %body["grant_type"], "Requesting token");

        let response =
            self.http.send(self.http.request(Method::POST, &self.token_url).json(&body)).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| EsignBridgeError::Network(format!("failed to read token response: {err}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Token request rejected");
            return Err(EsignBridgeError::upstream(status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|err| {
            EsignBridgeError::Internal(format!("failed to decode token response: {err}"))
        })
    }

    async fn store_tokens(&self, email: &str, tokens: &TokenResponse) -> Result<()> {
        let access_ttl = access_token_ttl(tokens.expires_in);
        self.store.set(&access_key(email), &tokens.access_token, access_ttl).await?;
        self.store
            .set(&refresh_key(email), &tokens.refresh_token, Some(self.refresh_token_ttl))
            .await?;

        debug!(
            email,
            access_ttl_secs = access_ttl.map(|ttl| ttl.as_secs()),
            refresh_ttl_secs = self.refresh_token_ttl.as_secs(),
            "Tokens stored"
        );
        Ok(())
    }
}

/// Access tokens are cached a minute shorter than their lifetime, or for
/// the full lifetime when it is under a minute. Non-positive lifetimes are
/// cached without expiry.
fn access_token_ttl(expires_in: i64) -> Option<Duration> {
    let secs = match expires_in - ACCESS_TOKEN_SAFETY_MARGIN_SECS {
        margin if margin < 0 => expires_in,
        margin => margin,
    };
    u64::try_from(secs).ok().filter(|s| *s > 0).map(Duration::from_secs)
}

fn access_key(email: &str) -> String {
    format!("{ACCESS_TOKEN_PREFIX}{email}")
}

fn refresh_key(email: &str) -> String {
    format!("{REFRESH_TOKEN_PREFIX}{email}")
}
