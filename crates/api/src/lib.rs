//! # EsignBridge API
//!
//! HTTP layer of the bridge.
//!
//! This crate contains:
//! - Axum handlers for the webhook, OAuth consent, e-sign and audit log routes
//! - Application context (dependency injection)
//! - Tracing setup and the health report
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod handlers;
pub mod response;
pub mod router;
pub mod utils;

pub use context::AppContext;
pub use router::build_router;
