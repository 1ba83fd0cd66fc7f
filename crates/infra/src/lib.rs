//! # EsignBridge Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - SQLite storage (audit log, OAuth codes, persistent key-value store)
//! - In-memory key-value store (moka)
//! - Filesystem document folders
//! - Signing provider and ERP HTTP clients
//! - Background status sink and configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `esignbridge-core`
//! - Contains all "impure" code (I/O, network, filesystem)

pub mod cache;
pub mod config;
pub mod database;
pub mod documents;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod sinks;

pub use cache::{MemoryKeyValueStore, SqliteKeyValueStore};
pub use database::{DbManager, SqliteApiLogRepository, SqliteAuthorizationCodeRepository};
pub use documents::FolderManager;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::erp::ODataErpClient;
pub use integrations::provider::{HmacSigner, ProviderAuth, ProviderClient, TokenService};
pub use sinks::BackgroundSink;
