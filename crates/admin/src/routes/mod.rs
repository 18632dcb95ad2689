//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health        - Health check (in main.rs)
//!
//! # Auth
//! POST /login         - Validate credentials, set session cookie
//! POST /logout        - Clear session cookie
//! GET  /session       - Current session, if any
//!
//! # Privileged (RequireAdmin)
//! GET  /admin         - Dashboard shell (redirects to /login when logged out)
//! GET  /api/admin/me  - Current admin identity (401 when logged out)
//! ```

use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod dashboard;

/// Build the full admin router.
pub fn routes() -> Router<AppState> {
    Router::new().merge(auth::router()).merge(dashboard::router())
}

/// Build the application router with state applied.
///
/// Used by `main` and by integration tests, which serve it in-process.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. This service has no external
/// dependencies to probe.
async fn health() -> &'static str {
    "ok"
}
