//! Privileged admin routes.
//!
//! These exist to put [`RequireAdmin`] in front of real handlers: `/admin`
//! is the page entry point the browser lands on (and gets redirected away
//! from when logged out), `/api/admin/me` is the JSON equivalent used by
//! the admin panel's frontend.

use axum::{
    Json, Router,
    response::{Html, IntoResponse},
    routing::get,
};

use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::auth::user_json;

/// Build the privileged router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/api/admin/me", get(me))
}

/// Admin dashboard shell.
///
/// GET /admin
///
/// Unauthenticated page requests are redirected to /login by the guard.
async fn dashboard(RequireAdmin(session): RequireAdmin) -> impl IntoResponse {
    Html(format!(
        "<!doctype html><title>Admin</title><h1>Welcome, {}</h1>",
        session.display_name
    ))
}

/// Current admin identity.
///
/// GET /api/admin/me
///
/// Unauthenticated API requests get a plain 401 from the guard.
async fn me(RequireAdmin(session): RequireAdmin) -> impl IntoResponse {
    Json(user_json(&session))
}
