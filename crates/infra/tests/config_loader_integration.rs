//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use esignbridge_domain::{AuthMode, CacheBackend, LogFormat};
use esignbridge_infra::config;
use tempfile::Builder;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "app": { "port": 9090, "base_url": "https://bridge.example.com" },
        "provider": {
            "auth_type": "hmac",
            "base_url": "https://sandbox-api.example.com/v2/esign/v1",
            "hmac": { "client_id": "hmac-id", "client_secret": "hmac-secret" }
        },
        "cache": { "backend": "memory", "max_capacity": 500 },
        "document": { "base_path": "/srv/esign", "ready_folder": "inbox" }
    }"#;

    let mut temp_file =
        Builder::new().suffix(".json").tempfile().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("JSON config should load");

    assert_eq!(config.app.port, 9090);
    assert_eq!(config.app.callback_url(), "https://bridge.example.com/webhook/mekari");
    assert_eq!(config.provider.auth_type, AuthMode::Hmac);
    assert_eq!(config.provider.credentials().client_id, "hmac-id");
    assert_eq!(config.cache.backend, CacheBackend::Memory);
    assert_eq!(config.cache.max_capacity, 500);
    assert!(config.document.ready_path().ends_with("inbox"));
    // Unspecified sections fall back to defaults.
    assert!(!config.erp.enabled);
    assert_eq!(config.provider.timeout_secs, 30);
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[provider]
auth_type = "oauth2"
base_url = "https://api.example.com/v2/esign/v1"
sso_base_url = "https://account.example.com"

[oauth]
refresh_token_age_days = 14

[logging]
level = "debug"
format = "json"

[erp]
enabled = true
base_url = "http://erp.local:7048/BC"
company = "PT Contoh"
"#;

    let mut temp_file =
        Builder::new().suffix(".toml").tempfile().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("TOML config should load");

    assert!(config.provider.is_oauth2());
    assert_eq!(config.provider.sso_base_url, "https://account.example.com");
    assert_eq!(config.oauth.refresh_token_age_days, 14);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.erp.enabled);
    assert_eq!(config.erp.company, "PT Contoh");
}

#[test]
fn test_load_config_file_not_found() {
    let result = config::load_from_file(Some("/nonexistent/config.toml".into()));
    assert!(result.is_err());
}

#[test]
fn test_load_config_invalid_toml() {
    let mut temp_file = Builder::new().suffix(".toml").tempfile().expect("temp file");
    temp_file.write_all(b"[provider\nbase_url = ").expect("write");

    let err = config::load_from_file(Some(temp_file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().contains("Invalid TOML"));
}

#[test]
fn test_load_config_unsupported_extension() {
    let mut temp_file = Builder::new().suffix(".yaml").tempfile().expect("temp file");
    temp_file.write_all(b"provider: {}").expect("write");

    let err = config::load_from_file(Some(temp_file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().contains("Unsupported config format"));
}
