//! # EsignBridge Domain
//!
//! Business types shared by every EsignBridge crate.
//!
//! This crate contains:
//! - Provider, webhook and ERP payload types
//! - Correlation records stored in the key-value cache
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other EsignBridge crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
