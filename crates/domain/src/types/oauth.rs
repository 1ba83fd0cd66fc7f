//! OAuth2 authorization records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization code stored per user after the provider redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCodeRecord {
    pub id: i64,
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCodeResponse {
    pub has_code: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub redirect_url: Option<String>,
}

/// Token endpoint answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: String,
}
