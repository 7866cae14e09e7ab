// crates/backoffice-server/src/routes/schema.rs
// ============================================================================
// Module: Schema Route
// Description: Table and column listing for the table explorer.
// Purpose: Expose the schema catalog as JSON.
// Dependencies: axum, backoffice-core
// ============================================================================

//! ## Overview
//! `GET {data_api_prefix}/tables` answers with every user table and its
//! columns as `{name, columns: [{name, type, notnull, pk, default}]}`.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use backoffice_core::SchemaCatalog;
use backoffice_core::TableDescriptor;

use crate::error::ApiError;
use crate::routes::run_blocking;
use crate::server::AppState;

/// Lists every table with its columns.
pub async fn list_tables(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TableDescriptor>>, ApiError> {
    let tables = run_blocking(|| state.store.catalog().list_tables())?;
    Ok(Json(tables))
}
