// crates/backoffice-server/src/routes/data.rs
// ============================================================================
// Module: Table Explorer Routes
// Description: Generic CRUD over any catalogued table.
// Purpose: Back the admin table explorer with path-named tables.
// Dependencies: axum, backoffice-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The table name comes straight from the path and is only ever resolved
//! through the schema catalog inside the store, so unknown names fail with
//! `404` before any statement mentioning them exists. Row identifiers for
//! `PUT` and `DELETE` travel in the `id` query parameter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use backoffice_core::Record;
use backoffice_core::RecordId;
use backoffice_core::RecordStore;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

use crate::error::ApiError;
use crate::routes::parse_record;
use crate::routes::run_blocking;
use crate::server::AppState;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Row selector carried in the query string.
#[derive(Debug, Deserialize)]
pub struct RowSelector {
    /// Raw identifier value.
    id: Option<String>,
}

impl RowSelector {
    /// Returns the parsed identifier or a validation error.
    fn require(&self) -> Result<RecordId, ApiError> {
        let raw = self.id.as_deref().ok_or_else(|| ApiError::Validation("id required".into()))?;
        Ok(RecordId::parse(raw)?)
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Lists every row of the table.
pub async fn list_rows(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let rows = run_blocking(|| state.store.list(&table))?;
    Ok(Json(rows))
}

/// Inserts a row and returns it with its identifier.
pub async fn insert_row(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let fields = parse_record(&body)?;
    let stored = run_blocking(|| state.store.insert(&table, fields))?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Merges fields into the selected row.
pub async fn update_row(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    Query(selector): Query<RowSelector>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let id = selector.require()?;
    let fields = parse_record(&body)?;
    let stored = run_blocking(|| state.store.update(&table, &id, fields))?;
    Ok(Json(json!({ "success": true, "record": stored })))
}

/// Deletes the selected row; missing rows report zero changes.
pub async fn delete_row(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    Query(selector): Query<RowSelector>,
) -> Result<Json<Value>, ApiError> {
    let id = selector.require()?;
    let outcome = run_blocking(|| state.store.delete(&table, &id))?;
    Ok(Json(json!({ "success": true, "changes": outcome.changes })))
}
