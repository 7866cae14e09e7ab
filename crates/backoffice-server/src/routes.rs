// crates/backoffice-server/src/routes.rs
// ============================================================================
// Module: HTTP Routes
// Description: Handlers behind the request gateway.
// Purpose: Translate HTTP requests into generic record store calls.
// Dependencies: axum, backoffice-core, serde_json, time, tokio
// ============================================================================

//! ## Overview
//! Handlers are thin: they parse the body into a [`Record`], pick a table
//! (from the path or the collection registry), and call the store. Store
//! calls are synchronous SQLite work and run through [`run_blocking`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod collections;
pub mod data;
pub mod page_content;
pub mod schema;
pub mod shell;

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::body::Bytes;
use backoffice_core::Record;
use time::OffsetDateTime;
use time::format_description;
use tokio::runtime::Handle;
use tokio::runtime::RuntimeFlavor;

use crate::error::ApiError;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Column timestamp layout matching `CURRENT_TIMESTAMP`.
const TIMESTAMP_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";

/// Runs synchronous store work without stalling other tasks.
pub(crate) fn run_blocking<T>(work: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

/// Parses a JSON object body into a record.
pub(crate) fn parse_record(body: &Bytes) -> Result<Record, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::Validation("request body required".to_string()));
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::Validation(format!("invalid record body: {err}")))
}

/// Returns the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn sql_timestamp() -> Result<String, ApiError> {
    let format = format_description::parse(TIMESTAMP_FORMAT)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    OffsetDateTime::now_utc().format(&format).map_err(|err| ApiError::Internal(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
