//! JSON response envelope shared by every endpoint
//!
//! Success: `{success: true, message, data}`.
//! Failure: `{success: false, message, error: {code, message}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use esignbridge_domain::EsignBridgeError;
use serde::Serialize;
use tracing::error;

use crate::utils::logging::error_label;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// 200 with a success envelope.
pub fn ok<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    with_status(StatusCode::OK, data, message)
}

pub fn with_status<T: Serialize>(status: StatusCode, data: T, message: impl Into<String>) -> Response {
    let body = ApiResponse { success: true, message: message.into(), data: Some(data), error: None };
    (status, Json(body)).into_response()
}

/// Error returned from a handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, code: "BAD_REQUEST", message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, code: "NOT_FOUND", message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Validation failures are the caller's fault; missing records map to 404;
/// everything else is a server error.
impl From<EsignBridgeError> for ApiError {
    fn from(err: EsignBridgeError) -> Self {
        match err {
            EsignBridgeError::Validation(message) => Self::bad_request(message),
            EsignBridgeError::NotFound(message) => Self::not_found(message),
            other => {
                error!(error_type = error_label(&other), error = %other, "Request failed");
                Self::internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse {
            success: false,
            message: self.message.clone(),
            data: None,
            error: Some(ErrorBody { code: self.code, message: self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult = Result<Response, ApiError>;
