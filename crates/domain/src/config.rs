//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub database: DatabaseConfig,
    pub oauth: OAuthConfig,
    pub document: DocumentConfig,
    pub logging: LoggingConfig,
    pub erp: ErpConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub env: String,
    /// Public URL the provider calls back on.
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "esignbridge".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            env: "development".to_string(),
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// Callback URL registered with the provider for status webhooks.
    pub fn callback_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), crate::constants::WEBHOOK_PATH)
    }
}

/// How requests to the signing provider are authenticated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    OAuth2,
    Hmac,
}

impl_domain_status_conversions!(AuthMode {
    OAuth2 => "oauth2",
    Hmac => "hmac",
});

/// Client id/secret pair
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientCredentials {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
}

/// Signing provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub auth_type: AuthMode,
    pub base_url: String,
    pub sso_base_url: String,
    pub auth_url: String,
    pub timeout_secs: u64,
    pub oauth2: ClientCredentials,
    pub hmac: ClientCredentials,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            auth_type: AuthMode::OAuth2,
            base_url: String::new(),
            sso_base_url: String::new(),
            auth_url: String::new(),
            timeout_secs: 30,
            oauth2: ClientCredentials::default(),
            hmac: ClientCredentials::default(),
        }
    }
}

impl ProviderConfig {
    pub fn is_oauth2(&self) -> bool {
        self.auth_type == AuthMode::OAuth2
    }

    /// Credentials for the active auth mode.
    pub fn credentials(&self) -> &ClientCredentials {
        match self.auth_type {
            AuthMode::OAuth2 => &self.oauth2,
            AuthMode::Hmac => &self.hmac,
        }
    }
}

/// Key-value cache backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    #[default]
    Sqlite,
}

/// Key-value cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { backend: CacheBackend::Sqlite, max_capacity: 100_000 }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "esignbridge.db".to_string(), pool_size: 4 }
    }
}

/// OAuth token lifetimes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub refresh_token_age_days: u32,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self { refresh_token_age_days: 30 }
    }
}

/// Local document queue folders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub base_path: String,
    pub ready_folder: String,
    pub progress_folder: String,
    pub finish_folder: String,
    pub file_extension: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            base_path: "documents".to_string(),
            ready_folder: "ready".to_string(),
            progress_folder: "progress".to_string(),
            finish_folder: "finish".to_string(),
            file_extension: ".pdf".to_string(),
        }
    }
}

impl DocumentConfig {
    pub fn ready_path(&self) -> PathBuf {
        PathBuf::from(&self.base_path).join(&self.ready_folder)
    }

    pub fn progress_path(&self) -> PathBuf {
        PathBuf::from(&self.base_path).join(&self.progress_folder)
    }

    pub fn finish_path(&self) -> PathBuf {
        PathBuf::from(&self.base_path).join(&self.finish_folder)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to daily rolling files here.
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Text, directory: None }
    }
}

/// ERP (OData) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ErpConfig {
    pub enabled: bool,
    pub base_url: String,
    pub company: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub timeout_secs: u64,
}

impl Default for ErpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            company: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
        }
    }
}
