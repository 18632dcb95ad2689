//! Authentication extractors for route handlers.
//!
//! Both extractors read the session straight from the inbound request's
//! `Cookie` header and delegate to the session manager's single decode
//! path, so handler-level reads and guard-level reads can never drift.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::SessionToken;
use crate::state::AppState;

/// Extractor that requires a valid admin session.
///
/// If no valid session is present, rejects with a redirect to the login
/// page for page requests, or 401 Unauthorized for API requests. Every
/// privileged route goes through this extractor.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(session): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", session.display_name)
/// }
/// ```
pub struct RequireAdmin(pub SessionToken);

/// Error returned when admin authentication is required but no valid
/// session is present.
pub enum AdminAuthRejection {
    /// Redirect to login page (for page requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        read_session(parts, state).map(Self).ok_or_else(|| {
            if parts.uri.path().starts_with("/api/") {
                AdminAuthRejection::Unauthorized
            } else {
                AdminAuthRejection::RedirectToLogin
            }
        })
    }
}

/// Extractor that optionally reads the current admin session.
///
/// Unlike [`RequireAdmin`], this never rejects the request.
pub struct OptionalAdmin(pub Option<SessionToken>);

impl FromRequestParts<AppState> for OptionalAdmin {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(read_session(parts, state)))
    }
}

/// Read and verify the session cookie from the request's `Cookie` header.
fn read_session(parts: &Parts, state: &AppState) -> Option<SessionToken> {
    let header = parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());

    state.sessions().session_from_cookie_header(header)
}
