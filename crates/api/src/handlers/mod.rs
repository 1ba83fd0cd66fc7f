//! HTTP handlers
//!
//! Handlers stay thin: parse the request, call one service on the
//! [`AppContext`](crate::context::AppContext), wrap the answer in the
//! response envelope.

pub mod esign;
pub mod health;
pub mod logs;
pub mod oauth;
pub mod webhook;

use crate::response::ApiError;

fn require_email(email: &str) -> Result<&str, ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("Email is required"));
    }
    Ok(email)
}
