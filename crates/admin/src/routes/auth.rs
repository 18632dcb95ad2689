//! Authentication route handlers.
//!
//! Login validates against the configured allow-list and sets the signed
//! session cookie; logout clears it; the session endpoint reports the
//! current state. Login failures stay generic so the responses cannot be
//! used to probe which emails are recognized.

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::SessionToken;
use crate::error::AppError;
use crate::middleware::OptionalAdmin;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
}

/// Login request body.
///
/// Fields are optional so that missing fields surface as a 400 with a
/// stable message rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// The `user` object returned by login and session responses.
pub(crate) fn user_json(token: &SessionToken) -> Value {
    let identity = token.identity();
    json!({
        "email": identity.email,
        "name": identity.name,
        "isAdmin": identity.is_admin,
    })
}

/// Validate credentials and start a session.
///
/// POST /login
///
/// 400 for missing fields, 403 for an email off the allow-list, 401 for a
/// wrong password. The 401/403 split is transport-layer only; both arms
/// return the same generic body.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let missing_fields =
        || AppError::BadRequest("email and password are required".to_string());

    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(missing_fields)?;
    let password = body
        .password
        .as_deref()
        .filter(|password| !password.is_empty())
        .ok_or_else(missing_fields)?;

    // Both failure arms share one message so the bodies are identical;
    // only the status code distinguishes them.
    const LOGIN_FAILED: &str = "invalid credentials";

    if !state.credentials().is_authorized_email(email) {
        return Err(AppError::Forbidden(LOGIN_FAILED.to_string()));
    }

    let identity = state
        .credentials()
        .validate_login(email, password)
        .ok_or_else(|| AppError::Unauthorized(LOGIN_FAILED.to_string()))?;

    let (token, cookie) = state
        .sessions()
        .create_session(&identity)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(email = %token.email, "admin logged in");

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({
            "success": true,
            "user": user_json(&token),
        })),
    )
        .into_response())
}

/// Clear the session cookie.
///
/// POST /logout
///
/// Deletes the cookie client-side only; a copied token stays valid until
/// expiry. Safe to call without a session.
async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = state.sessions().clear_cookie();

    (
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    )
}

/// Report the current session state.
///
/// GET /session
async fn session(OptionalAdmin(session): OptionalAdmin) -> Json<Value> {
    match session {
        Some(token) => Json(json!({
            "authenticated": true,
            "user": user_json(&token),
        })),
        None => Json(json!({ "authenticated": false })),
    }
}
