//! Webhook-driven document lifecycle

pub mod service;

pub use service::{WebhookOutcome, WebhookProcessor};
