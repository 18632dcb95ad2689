//! Unified error handling for the admin API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No valid admin session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Email is not on the admin allow-list.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Report server errors to Sentry
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Client bodies carry the bare message, without the error-taxonomy
        // prefix from Display: login failures must read identically across
        // the 401/403 split. Internal details never reach the client.
        let message = match self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::BadRequest(message) | Self::Unauthorized(message) | Self::Forbidden(message) => {
                message
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
