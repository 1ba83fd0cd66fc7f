//! OAuth2 consent flow: code capture, status checks and token maintenance

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use esignbridge_infra::TokenService;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::response::{self, ApiError, ApiResult};

use super::require_email;

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    code: String,
    /// Email the consent was requested for.
    #[serde(default)]
    state: String,
    #[serde(default)]
    locale: String,
}

#[derive(Debug, Default, Deserialize)]
struct CodeRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    code: String,
}

fn parse_code_request(body: &Bytes) -> Result<CodeRequest, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Invalid request body"))
}

/// Provider redirect after the user granted access.
pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<CallbackQuery>,
) -> ApiResult {
    info!(state = %query.state, locale = %query.locale, "OAuth callback received");

    if query.code.is_empty() {
        return Err(ApiError::bad_request("Authorization code is required"));
    }
    if query.state.is_empty() {
        return Err(ApiError::bad_request("State (email) is required"));
    }

    ctx.oauth.save_code(&query.state, &query.code).await?;
    Ok(response::ok(
        json!({ "email": query.state, "code": query.code, "locale": query.locale }),
        "OAuth code saved successfully",
    ))
}

pub async fn check_code(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<EmailQuery>,
) -> ApiResult {
    let email = require_email(&query.email)?;
    let status = ctx.oauth.check_code(email).await?;
    let message = if status.has_code { "OAuth code exists" } else { "No OAuth code found. Please authorize." };
    Ok(response::ok(status, message))
}

/// Like `check_code`, but sends users without a code straight to the
/// consent page.
pub async fn authorize(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<EmailQuery>,
) -> ApiResult {
    let email = require_email(&query.email)?;
    let status = ctx.oauth.check_code(email).await?;

    match status.redirect_url.as_deref() {
        Some(url) if !status.has_code => {
            info!(email, redirect_url = url, "Redirecting to provider consent page");
            Ok((StatusCode::FOUND, [(LOCATION, url.to_string())]).into_response())
        }
        _ => Ok(response::ok(status, "OAuth code already exists")),
    }
}

pub async fn save_code(State(ctx): State<Arc<AppContext>>, body: Bytes) -> ApiResult {
    let request = parse_code_request(&body)?;
    if request.email.is_empty() || request.code.is_empty() {
        return Err(ApiError::bad_request("Email and code are required"));
    }

    ctx.oauth.save_code(&request.email, &request.code).await?;
    Ok(response::ok(json!({ "email": request.email }), "OAuth code saved successfully"))
}

pub async fn exchange_code(State(ctx): State<Arc<AppContext>>, body: Bytes) -> ApiResult {
    let request = parse_code_request(&body)?;
    let email = require_email(&request.email)?;
    if request.code.is_empty() {
        return Err(ApiError::bad_request("Code is required"));
    }

    let tokens = token_service(&ctx)?;
    let issued = tokens
        .exchange_code(email, &request.code)
        .await
        .map_err(|err| ApiError::internal(err.to_string()))?;

    if let Err(err) = ctx.oauth.save_code(email, &request.code).await {
        warn!(email, error = %err, "Failed to save exchanged code");
    }

    Ok(response::ok(
        json!({
            "email": email,
            "access_token": issued.access_token,
            "token_type": issued.token_type,
            "expires_in": issued.expires_in,
        }),
        "Code exchanged for tokens successfully",
    ))
}

pub async fn refresh_token(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<EmailQuery>,
) -> ApiResult {
    let email = require_email(&query.email)?;
    let tokens = token_service(&ctx)?;
    let issued =
        tokens.refresh_token(email).await.map_err(|err| ApiError::internal(err.to_string()))?;

    Ok(response::ok(
        json!({
            "email": email,
            "access_token": issued.access_token,
            "token_type": issued.token_type,
            "expires_in": issued.expires_in,
        }),
        "Token refreshed successfully",
    ))
}

pub async fn get_token(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<EmailQuery>,
) -> ApiResult {
    let email = require_email(&query.email)?;
    match ctx.oauth.code_record(email).await? {
        Some(record) => Ok(response::ok(record, "OAuth token retrieved successfully")),
        None => Err(ApiError::not_found("OAuth token not found for this email")),
    }
}

fn token_service(ctx: &AppContext) -> Result<&Arc<TokenService>, ApiError> {
    ctx.tokens
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("OAuth2 is not enabled for this provider"))
}
