//! Audit log queries

use std::sync::Arc;

use axum::extract::{Query, State};
use serde::Deserialize;

use crate::context::AppContext;
use crate::response::{self, ApiError, ApiResult};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    invoice: String,
}

fn clamp_limit(limit: Option<&str>) -> usize {
    limit.and_then(|v| v.trim().parse().ok()).unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
}

pub async fn recent(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<LogsQuery>,
) -> ApiResult {
    let logs = ctx.api_logs.find_all(clamp_limit(query.limit.as_deref())).await?;
    Ok(response::ok(logs, "Logs retrieved successfully"))
}

pub async fn search(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult {
    let invoice = query.invoice.trim();
    if invoice.is_empty() {
        return Err(ApiError::bad_request("invoice parameter required"));
    }
    let logs = ctx.api_logs.find_by_invoice(invoice).await?;
    Ok(response::ok(logs, "Logs retrieved successfully"))
}
