// crates/backoffice-server/src/error.rs
// ============================================================================
// Module: API Errors
// Description: HTTP error taxonomy and JSON error bodies.
// Purpose: Map data and session failures onto stable status codes.
// Dependencies: axum, backoffice-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Handlers return [`ApiError`] and let `?` convert [`DataError`] values.
//! Every error body is `{"error": "..."}`. Internal failures answer with a
//! generic message; the real detail rides along in an [`InternalDetail`]
//! response extension so the gateway can record it in the audit log.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use backoffice_core::DataError;
use serde_json::json;
use thiserror::Error;

use crate::session::SessionError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Body message for internal failures.
const INTERNAL_MESSAGE: &str = "internal server error";

/// Body message for failed logins.
const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

// ============================================================================
// SECTION: Types
// ============================================================================

/// API-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Table, row, collection, or route is absent.
    #[error("{0}")]
    NotFound(String),
    /// Malformed input.
    #[error("{0}")]
    Validation(String),
    /// Resource exists but rejects the method.
    #[error("{0}")]
    MethodNotAllowed(String),
    /// Missing or invalid session.
    #[error("unauthorized")]
    Unauthorized,
    /// Username or secret did not match.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Store engine failure.
    #[error("store failure: {0}")]
    Store(String),
    /// Other internal failure.
    #[error("internal failure: {0}")]
    Internal(String),
}

/// Internal failure detail attached to 500 responses.
#[derive(Debug, Clone)]
pub struct InternalDetail(pub String);

impl ApiError {
    /// Returns the HTTP status for the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(detail) => Self::NotFound(format!("not found: {detail}")),
            DataError::Validation(detail) => Self::Validation(detail),
            DataError::Store(detail) => Self::Store(detail),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidSession => Self::Unauthorized,
            SessionError::Encoding(detail) => Self::Internal(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Store(detail) | Self::Internal(detail) => {
                let body = Json(json!({ "error": INTERNAL_MESSAGE }));
                let mut response = (status, body).into_response();
                response.extensions_mut().insert(InternalDetail(detail));
                response
            }
            Self::InvalidCredentials => {
                (status, Json(json!({ "error": INVALID_CREDENTIALS_MESSAGE }))).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
