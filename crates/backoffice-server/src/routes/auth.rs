// crates/backoffice-server/src/routes/auth.rs
// ============================================================================
// Module: Auth Routes
// Description: Login, logout, and session introspection.
// Purpose: Check credentials and hand out session cookies.
// Dependencies: axum, backoffice-store-sqlite, serde, serde_json
// ============================================================================

//! ## Overview
//! Login is the only place a session token is issued, and only after the
//! supplied secret matches the stored credential. Unknown users and wrong
//! secrets share one response and run the same digest work.
//! Security posture: the secret never reaches logs or audit events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use backoffice_config::SessionConfig;
use serde::Deserialize;
use serde_json::json;

use crate::audit::AuthAuditEvent;
use crate::credentials::verify_decoy;
use crate::credentials::verify_secret;
use crate::error::ApiError;
use crate::routes::run_blocking;
use crate::server::AppState;
use crate::session::SessionPayload;
use crate::session::unix_now;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Login request body.
#[derive(Deserialize)]
struct LoginBody {
    /// Login name.
    username: String,
    /// Plaintext secret.
    password: String,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Verifies credentials and sets the session cookie.
pub async fn login(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let body: LoginBody = serde_json::from_slice(&body)
        .map_err(|_| ApiError::Validation("username and password required".to_string()))?;
    let user = run_blocking(|| state.store.find_user(&body.username))?;
    let user = match user {
        Some(user) if verify_secret(&user.secret, &body.password) => user,
        found => {
            if found.is_none() {
                verify_decoy(&body.password);
            }
            state.audit.record_auth(&AuthAuditEvent::new("login", "failure", Some(body.username)));
            return Err(ApiError::InvalidCredentials);
        }
    };
    let session = &state.config.session;
    let payload = SessionPayload::new(user.id, user.username, unix_now(), session.ttl_secs);
    let token = state.codec.issue(&payload)?;
    let cookie = session_cookie(session, &token, session.ttl_secs)?;
    state.audit.record_auth(&AuthAuditEvent::new("login", "success", Some(payload.username)));
    Ok(([(header::SET_COOKIE, cookie)], Json(json!({ "success": true }))).into_response())
}

/// Clears the session cookie.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: Option<Extension<SessionPayload>>,
) -> Result<Response, ApiError> {
    let cookie = session_cookie(&state.config.session, "", 0)?;
    let username = session.map(|Extension(payload)| payload.username);
    state.audit.record_auth(&AuthAuditEvent::new("logout", "success", username));
    Ok(([(header::SET_COOKIE, cookie)], Json(json!({ "success": true }))).into_response())
}

/// Describes the caller's session.
pub async fn current_session(
    session: Option<Extension<SessionPayload>>,
) -> Result<Response, ApiError> {
    let Some(Extension(payload)) = session else {
        return Err(ApiError::Unauthorized);
    };
    Ok(Json(json!({
        "userId": payload.user_id,
        "username": payload.username,
        "expiresAt": payload.expires_at,
    }))
    .into_response())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the `Set-Cookie` value for a token.
fn session_cookie(
    config: &SessionConfig,
    token: &str,
    max_age: u64,
) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}",
        config.cookie_name
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|err| ApiError::Internal(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
