// crates/backoffice-server/src/routes/page_content.rs
// ============================================================================
// Module: Page Content Routes
// Description: Keyed JSON sections for editable page copy.
// Purpose: Store and serve page sections addressed by a text key.
// Dependencies: axum, backoffice-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Sections live in the `page_content` table keyed by `sectionKey`, with the
//! section body stored as JSON text in `content`. Responses parse `content`
//! back into JSON. The store handle used here resolves identifiers by the
//! declared primary key rather than the conventional `id` column.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::Query;
use axum::extract::State;
use backoffice_core::DataError;
use backoffice_core::FieldValue;
use backoffice_core::Record;
use backoffice_core::RecordId;
use backoffice_core::RecordStore;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::error::ApiError;
use crate::routes::run_blocking;
use crate::routes::sql_timestamp;
use crate::server::AppState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Table holding page sections.
pub const PAGE_CONTENT_TABLE: &str = "page_content";
/// Section key column.
const KEY_COLUMN: &str = "sectionKey";
/// JSON body column.
const CONTENT_COLUMN: &str = "content";
/// Last-write column.
const UPDATED_COLUMN: &str = "updatedAt";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Optional section selector.
#[derive(Debug, Deserialize)]
pub struct SectionQuery {
    /// Section key.
    key: Option<String>,
}

/// Section write body.
#[derive(Debug, Deserialize)]
struct SectionBody {
    /// Section key.
    key: String,
    /// Section content (any JSON value).
    content: Value,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Returns one section (or `{}`), or every section without a key.
pub async fn get_sections(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SectionQuery>,
) -> Result<Json<Value>, ApiError> {
    let Some(key) = query.key else {
        let rows = run_blocking(|| state.pages.list(PAGE_CONTENT_TABLE))?;
        return Ok(Json(Value::Array(rows.iter().map(section_json).collect())));
    };
    let id = section_id(&key)?;
    match run_blocking(|| state.pages.get(PAGE_CONTENT_TABLE, &id)) {
        Ok(row) => Ok(Json(section_json(&row))),
        Err(DataError::NotFound(_)) => Ok(Json(json!({}))),
        Err(err) => Err(err.into()),
    }
}

/// Creates or replaces a section.
pub async fn put_section(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let body: SectionBody = serde_json::from_slice(&body)
        .map_err(|err| ApiError::Validation(format!("invalid section body: {err}")))?;
    let id = section_id(&body.key)?;
    let record = Record::new()
        .with(KEY_COLUMN, id.to_field())
        .with(CONTENT_COLUMN, body.content.to_string())
        .with(UPDATED_COLUMN, sql_timestamp()?);
    run_blocking(|| state.pages.upsert(PAGE_CONTENT_TABLE, record))?;
    Ok(Json(json!({ "success": true })))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a text identifier from a section key.
fn section_id(key: &str) -> Result<RecordId, ApiError> {
    if key.trim().is_empty() {
        return Err(ApiError::Validation("section key required".to_string()));
    }
    Ok(RecordId::Text(key.to_string()))
}

/// Renders a section row with `content` parsed as JSON.
fn section_json(row: &Record) -> Value {
    let mut object = Map::new();
    for (name, value) in row.iter() {
        let rendered = match value {
            FieldValue::Text(text) if name == CONTENT_COLUMN => {
                serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
            }
            other => serde_json::to_value(other).unwrap_or(Value::Null),
        };
        object.insert(name.to_string(), rendered);
    }
    Value::Object(object)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
