// crates/backoffice-server/src/routes/shell.rs
// ============================================================================
// Module: Page Shell
// Description: Minimal HTML for the login page and application root.
// Purpose: Give page routes a concrete target behind the gateway.
// Dependencies: axum
// ============================================================================

//! ## Overview
//! The admin UI is served elsewhere; these pages only mark where it mounts.
//! Unknown API paths answer with the JSON error body; unknown pages with text.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::error::ApiError;
use crate::server::AppState;

/// Login page markup.
const LOGIN_HTML: &str = "<!doctype html><html><head><meta charset=\"utf-8\"><title>Sign \
                          in</title></head><body><main id=\"login\"></main></body></html>";

/// Application root markup.
const APP_HTML: &str = "<!doctype html><html><head><meta \
                        charset=\"utf-8\"><title>Backoffice</title></head><body><main \
                        id=\"app\"></main></body></html>";

/// Serves the login page.
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

/// Serves the application root.
pub async fn app_root() -> Html<&'static str> {
    Html(APP_HTML)
}

/// Answers unknown routes.
pub async fn not_found(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    if state.gateway.classify(uri.path()).is_api() {
        return ApiError::NotFound(format!("no route for {}", uri.path())).into_response();
    }
    (StatusCode::NOT_FOUND, "not found").into_response()
}
