use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;

use crate::context::AppContext;
use crate::response;

pub async fn health(State(ctx): State<Arc<AppContext>>) -> Response {
    let report = ctx.health_check();
    let message = if report.is_healthy() { "Service is healthy" } else { "Service is degraded" };
    response::ok(report, message)
}
