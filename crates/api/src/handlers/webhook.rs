//! Provider status callbacks

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use esignbridge_domain::WebhookPayload;
use esignbridge_infra::integrations::provider::redact;
use serde_json::json;
use tracing::{error, info};

use crate::context::AppContext;
use crate::response::{self, ApiError, ApiResult};
use crate::utils::logging::error_label;

/// Every processing failure answers 500 so the provider redelivers, missing
/// correlation entries included.
pub async fn mekari_callback(State(ctx): State<Arc<AppContext>>, body: Bytes) -> ApiResult {
    info!(body = %redact::for_log(&String::from_utf8_lossy(&body)), "Received webhook callback");

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|err| {
        error!(error = %err, "Failed to parse webhook payload");
        ApiError::bad_request("Invalid webhook payload")
    })?;

    if payload.document_id().is_empty() {
        error!("Missing document ID in webhook payload");
        return Err(ApiError::bad_request("Missing document ID"));
    }

    let outcome = ctx.webhooks.process(&payload).await.map_err(|err| {
        error!(
            document_id = payload.document_id(),
            error_type = error_label(&err),
            error = %err,
            "Failed to process webhook"
        );
        ApiError::internal(err.to_string())
    })?;

    Ok(response::ok(
        json!({
            "document_id": outcome.document_id,
            "signing_status": outcome.signing_status,
            "lifecycle": outcome.lifecycle.as_str(),
            "processed": true,
        }),
        "Webhook processed successfully",
    ))
}
