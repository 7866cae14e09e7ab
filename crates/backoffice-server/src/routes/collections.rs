// crates/backoffice-server/src/routes/collections.rs
// ============================================================================
// Module: Collection Routes
// Description: Named content collections mapped onto tables.
// Purpose: Serve the published site's content types through one handler set.
// Dependencies: axum, backoffice-config, backoffice-core, serde_json
// ============================================================================

//! ## Overview
//! A collection names a table plus its list ordering, the query parameters
//! accepted as equality filters, and an optional column stamped on writes.
//! Reads are public; the gateway requires a session for mutations, and
//! read-only collections refuse them with `405`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use backoffice_config::CollectionConfig;
use backoffice_core::FieldValue;
use backoffice_core::Record;
use backoffice_core::RecordId;
use backoffice_core::RecordStore;
use serde_json::Value;
use serde_json::json;

use crate::error::ApiError;
use crate::routes::parse_record;
use crate::routes::run_blocking;
use crate::routes::sql_timestamp;
use crate::server::AppState;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Lists a collection with its ordering and accepted filters.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let collection = lookup(&state, &name)?;
    let mut filters: Vec<(&String, &String)> =
        params.iter().filter(|(key, _)| collection.accepts_filter(key)).collect();
    filters.sort();
    let mut query = collection.list_query(!filters.is_empty());
    for (column, raw) in filters {
        query = query.filter(column.clone(), filter_value(raw));
    }
    let rows = run_blocking(|| state.store.list_where(&collection.table, &query))?;
    Ok(Json(rows))
}

/// Inserts an item into the collection.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let collection = writable(&state, &name)?;
    let mut fields = parse_record(&body)?;
    touch(collection, &mut fields)?;
    let stored = run_blocking(|| state.store.insert(&collection.table, fields))?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Fetches one item.
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<Record>, ApiError> {
    let collection = lookup(&state, &name)?;
    let id = RecordId::parse(&id)?;
    let stored = run_blocking(|| state.store.get(&collection.table, &id))?;
    Ok(Json(stored))
}

/// Merges fields into one item.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path((name, id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Record>, ApiError> {
    let collection = writable(&state, &name)?;
    let id = RecordId::parse(&id)?;
    let mut fields = parse_record(&body)?;
    touch(collection, &mut fields)?;
    let stored = run_blocking(|| state.store.update(&collection.table, &id, fields))?;
    Ok(Json(stored))
}

/// Deletes one item; absent items are `404` here.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let collection = writable(&state, &name)?;
    let id = RecordId::parse(&id)?;
    let outcome = run_blocking(|| state.store.delete(&collection.table, &id))?;
    if !outcome.deleted() {
        return Err(ApiError::NotFound(format!("{name} item not found")));
    }
    Ok(Json(json!({ "success": true })))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves a collection by name.
fn lookup<'a>(state: &'a AppState, name: &str) -> Result<&'a CollectionConfig, ApiError> {
    state
        .config
        .collection(name)
        .ok_or_else(|| ApiError::NotFound(format!("unknown collection `{name}`")))
}

/// Resolves a collection that accepts writes.
fn writable<'a>(state: &'a AppState, name: &str) -> Result<&'a CollectionConfig, ApiError> {
    let collection = lookup(state, name)?;
    if collection.read_only {
        return Err(ApiError::MethodNotAllowed(format!("collection `{name}` is read-only")));
    }
    Ok(collection)
}

/// Stamps the collection's touch column, if any.
fn touch(collection: &CollectionConfig, fields: &mut Record) -> Result<(), ApiError> {
    if let Some(column) = &collection.touch_column {
        fields.set(column.clone(), sql_timestamp()?);
    }
    Ok(())
}

/// Converts a query value, keeping integers numeric.
fn filter_value(raw: &str) -> FieldValue {
    raw.parse::<i64>().map_or_else(|_| FieldValue::Text(raw.to_string()), FieldValue::Integer)
}
