//! External service integrations

pub mod erp;
pub mod provider;
