//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required variables are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `ESIGN_PROVIDER_BASE_URL`: Signing provider API base URL
//! - `ESIGN_DOCUMENT_BASE_PATH`: Root of the ready/progress/finish folders
//!
//! Optional (defaults from [`Config::default`]):
//! - `ESIGN_APP_HOST`, `ESIGN_APP_PORT`, `ESIGN_APP_ENV`, `ESIGN_APP_BASE_URL`
//! - `ESIGN_PROVIDER_AUTH_TYPE` (`oauth2` | `hmac`),
//!   `ESIGN_PROVIDER_SSO_BASE_URL`, `ESIGN_PROVIDER_AUTH_URL`,
//!   `ESIGN_PROVIDER_TIMEOUT_SECS`
//! - `ESIGN_OAUTH2_CLIENT_ID`, `ESIGN_OAUTH2_CLIENT_SECRET`
//! - `ESIGN_HMAC_CLIENT_ID`, `ESIGN_HMAC_CLIENT_SECRET`
//! - `ESIGN_REFRESH_TOKEN_AGE_DAYS`
//! - `ESIGN_CACHE_BACKEND` (`sqlite` | `memory`), `ESIGN_CACHE_MAX_CAPACITY`
//! - `ESIGN_DB_PATH`, `ESIGN_DB_POOL_SIZE`
//! - `ESIGN_DOCUMENT_READY_FOLDER`, `ESIGN_DOCUMENT_PROGRESS_FOLDER`,
//!   `ESIGN_DOCUMENT_FINISH_FOLDER`, `ESIGN_DOCUMENT_FILE_EXTENSION`
//! - `ESIGN_LOG_LEVEL`, `ESIGN_LOG_FORMAT` (`text` | `json`), `ESIGN_LOG_DIR`
//! - `ESIGN_ERP_ENABLED` (true/false), `ESIGN_ERP_BASE_URL`,
//!   `ESIGN_ERP_COMPANY`, `ESIGN_ERP_USERNAME`, `ESIGN_ERP_PASSWORD`,
//!   `ESIGN_ERP_TIMEOUT_SECS`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.toml` or `./config.json` (current working directory)
//! 2. `./esignbridge.toml` or `./esignbridge.json` (current working directory)
//! 3. `../config.toml` or `../config.json` (parent directory)
//! 4. `../../config.toml` or `../../config.json` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use esignbridge_domain::{
    AuthMode, CacheBackend, Config, EsignBridgeError, LogFormat, Result,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `EsignBridgeError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `EsignBridgeError::Config` if a required variable is missing or
/// a numeric/enum variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.provider.base_url = env_var("ESIGN_PROVIDER_BASE_URL")?;
    config.document.base_path = env_var("ESIGN_DOCUMENT_BASE_PATH")?;

    override_string("ESIGN_APP_HOST", &mut config.app.host);
    override_parsed("ESIGN_APP_PORT", &mut config.app.port)?;
    override_string("ESIGN_APP_ENV", &mut config.app.env);
    override_string("ESIGN_APP_BASE_URL", &mut config.app.base_url);

    if let Ok(raw) = std::env::var("ESIGN_PROVIDER_AUTH_TYPE") {
        config.provider.auth_type = AuthMode::from_str(&raw).map_err(EsignBridgeError::Config)?;
    }
    override_string("ESIGN_PROVIDER_SSO_BASE_URL", &mut config.provider.sso_base_url);
    override_string("ESIGN_PROVIDER_AUTH_URL", &mut config.provider.auth_url);
    override_parsed("ESIGN_PROVIDER_TIMEOUT_SECS", &mut config.provider.timeout_secs)?;
    override_string("ESIGN_OAUTH2_CLIENT_ID", &mut config.provider.oauth2.client_id);
    override_string("ESIGN_OAUTH2_CLIENT_SECRET", &mut config.provider.oauth2.client_secret);
    override_string("ESIGN_HMAC_CLIENT_ID", &mut config.provider.hmac.client_id);
    override_string("ESIGN_HMAC_CLIENT_SECRET", &mut config.provider.hmac.client_secret);
    override_parsed("ESIGN_REFRESH_TOKEN_AGE_DAYS", &mut config.oauth.refresh_token_age_days)?;

    if let Ok(raw) = std::env::var("ESIGN_CACHE_BACKEND") {
        config.cache.backend = match raw.trim().to_ascii_lowercase().as_str() {
            "sqlite" => CacheBackend::Sqlite,
            "memory" => CacheBackend::Memory,
            other => {
                return Err(EsignBridgeError::Config(format!("Invalid cache backend: {}", other)))
            }
        };
    }
    override_parsed("ESIGN_CACHE_MAX_CAPACITY", &mut config.cache.max_capacity)?;

    override_string("ESIGN_DB_PATH", &mut config.database.path);
    override_parsed("ESIGN_DB_POOL_SIZE", &mut config.database.pool_size)?;

    override_string("ESIGN_DOCUMENT_READY_FOLDER", &mut config.document.ready_folder);
    override_string("ESIGN_DOCUMENT_PROGRESS_FOLDER", &mut config.document.progress_folder);
    override_string("ESIGN_DOCUMENT_FINISH_FOLDER", &mut config.document.finish_folder);
    override_string("ESIGN_DOCUMENT_FILE_EXTENSION", &mut config.document.file_extension);

    override_string("ESIGN_LOG_LEVEL", &mut config.logging.level);
    if let Ok(raw) = std::env::var("ESIGN_LOG_FORMAT") {
        config.logging.format = match raw.trim().to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => return Err(EsignBridgeError::Config(format!("Invalid log format: {}", other))),
        };
    }
    config.logging.directory = std::env::var("ESIGN_LOG_DIR").ok().filter(|s| !s.is_empty());

    config.erp.enabled = env_bool("ESIGN_ERP_ENABLED", config.erp.enabled);
    override_string("ESIGN_ERP_BASE_URL", &mut config.erp.base_url);
    override_string("ESIGN_ERP_COMPANY", &mut config.erp.company);
    override_string("ESIGN_ERP_USERNAME", &mut config.erp.username);
    override_string("ESIGN_ERP_PASSWORD", &mut config.erp.password);
    override_parsed("ESIGN_ERP_TIMEOUT_SECS", &mut config.erp.timeout_secs)?;

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `EsignBridgeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EsignBridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            EsignBridgeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EsignBridgeError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| EsignBridgeError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EsignBridgeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(EsignBridgeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
        candidates.extend([
            cwd.join("../config.toml"),
            cwd.join("../config.json"),
            cwd.join("../../config.toml"),
            cwd.join("../../config.json"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> [PathBuf; 4] {
    [
        dir.join("config.toml"),
        dir.join("config.json"),
        dir.join("esignbridge.toml"),
        dir.join("esignbridge.json"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `EsignBridgeError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty()).ok_or_else(|| {
        EsignBridgeError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn override_string(key: &str, target: &mut String) {
    if let Ok(value) = std::env::var(key) {
        if !value.is_empty() {
            *target = value;
        }
    }
}

fn override_parsed<T>(key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = std::env::var(key) {
        *target = raw
            .trim()
            .parse::<T>()
            .map_err(|e| EsignBridgeError::Config(format!("Invalid value for {}: {}", key, e)))?;
    }
    Ok(())
}
