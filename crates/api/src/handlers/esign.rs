//! Provider passthrough endpoints and sign request submission

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use esignbridge_domain::GlobalSignRequest;
use serde::Deserialize;
use tracing::error;

use crate::context::AppContext;
use crate::response::{self, ApiError, ApiResult};
use crate::utils::logging::error_label;

use super::oauth::EmailQuery;
use super::require_email;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct DocumentsQuery {
    #[serde(default)]
    email: String,
    page: Option<String>,
    per_page: Option<String>,
}

/// Unparseable paging values fall back to the defaults.
fn page_param(value: Option<&str>, default: u32) -> u32 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

pub async fn profile(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<EmailQuery>,
) -> ApiResult {
    let email = require_email(&query.email)?;
    let profile = ctx.provider.profile(email).await.map_err(|err| {
        error!(email, error = %err, "Failed to get profile");
        ApiError::internal(err.to_string())
    })?;
    Ok(response::ok(profile, "Profile retrieved successfully"))
}

pub async fn documents(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<DocumentsQuery>,
) -> ApiResult {
    let email = require_email(&query.email)?;
    let page = page_param(query.page.as_deref(), DEFAULT_PAGE);
    let per_page = page_param(query.per_page.as_deref(), DEFAULT_PER_PAGE);

    let documents = ctx.provider.documents(email, page, per_page).await.map_err(|err| {
        error!(email, page, per_page, error = %err, "Failed to get documents");
        ApiError::internal(err.to_string())
    })?;
    Ok(response::ok(documents, "Documents retrieved successfully"))
}

/// 201 when the provider accepted the document, 200 when the user still has
/// to authorize the bridge.
pub async fn request_sign(State(ctx): State<Arc<AppContext>>, body: Bytes) -> ApiResult {
    let request: GlobalSignRequest = serde_json::from_slice(&body).map_err(|err| {
        error!(error = %err, "Failed to parse sign request body");
        ApiError::bad_request("Invalid request body")
    })?;

    let outcome = ctx.initiator.request_sign(&request).await.map_err(|err| {
        error!(
            invoice_number = %request.invoice_number,
            entry_no = request.entry_no,
            error_type = error_label(&err),
            error = %err,
            "Failed to request global sign"
        );
        if err.is_validation() {
            ApiError::from(err)
        } else {
            ApiError::internal(err.to_string())
        }
    })?;

    let result = outcome.into_result();
    let status = if result.need_auth { StatusCode::OK } else { StatusCode::CREATED };
    let message = result.message.clone();
    Ok(response::with_status(status, result, message))
}
