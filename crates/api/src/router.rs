use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use esignbridge_domain::constants::WEBHOOK_PATH;

use crate::context::AppContext;
use crate::handlers::{esign, health, logs, oauth, webhook};

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let oauth_routes = Router::new()
        .route("/check", get(oauth::check_code))
        .route("/authorize", get(oauth::authorize))
        .route("/save-code", post(oauth::save_code))
        .route("/exchange", post(oauth::exchange_code))
        .route("/refresh", post(oauth::refresh_token))
        .route("/token", get(oauth::get_token));

    let esign_routes = Router::new()
        .route("/profile", get(esign::profile))
        .route("/documents", get(esign::documents))
        .route("/documents/request-sign", post(esign::request_sign));

    Router::new()
        .route("/health", get(health::health))
        .route("/redirect/oauth", get(oauth::callback))
        .route(WEBHOOK_PATH, post(webhook::mekari_callback))
        .nest("/api/v1/oauth", oauth_routes)
        .nest("/api/v1/esign", esign_routes)
        .route("/api/v1/logs", get(logs::recent))
        .route("/api/v1/logs/search", get(logs::search))
        .with_state(ctx)
}
