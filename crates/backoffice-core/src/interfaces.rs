// crates/backoffice-core/src/interfaces.rs
// ============================================================================
// Module: Data Access Interfaces
// Description: Backend-agnostic schema catalog and record store contracts.
// Purpose: Let resource handlers operate on arbitrary tables without SQL.
// Dependencies: crate::{query, schema, value}, thiserror
// ============================================================================

//! ## Overview
//! [`SchemaCatalog`] reports which tables and columns exist; [`RecordStore`]
//! performs record operations against tables by name. Implementations must
//! resolve every table name through the catalog before constructing a query
//! and must fail closed with [`DataError::NotFound`] or
//! [`DataError::Validation`] when a name is unknown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::query::ListQuery;
use crate::schema::TableDescriptor;
use crate::value::Record;
use crate::value::RecordId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Data access errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// Table, row, or route is absent.
    #[error("not found: {0}")]
    NotFound(String),
    /// Malformed or unknown fields, or a missing identifier.
    #[error("validation error: {0}")]
    Validation(String),
    /// Underlying engine failure.
    #[error("store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of a delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Number of rows removed.
    pub changes: usize,
}

impl DeleteOutcome {
    /// Returns true when at least one row was removed.
    #[must_use]
    pub const fn deleted(self) -> bool {
        self.changes > 0
    }
}

// ============================================================================
// SECTION: Schema Catalog
// ============================================================================

/// Runtime view of the tables and columns in the store.
pub trait SchemaCatalog {
    /// Lists all user tables, excluding engine-internal tables.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Store`] when the metadata query fails.
    fn list_tables(&self) -> Result<Vec<TableDescriptor>, DataError>;

    /// Describes a single table.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] when the table does not exist.
    fn describe_table(&self, name: &str) -> Result<TableDescriptor, DataError>;
}

// ============================================================================
// SECTION: Record Store
// ============================================================================

/// Generic record operations parameterized by table name.
pub trait RecordStore {
    /// Lists every row of a table.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] for unknown tables.
    fn list(&self, table: &str) -> Result<Vec<Record>, DataError> {
        self.list_where(table, &ListQuery::new())
    }

    /// Lists rows matching equality filters in the requested order.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] for unknown tables and
    /// [`DataError::Validation`] for unknown columns.
    fn list_where(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>, DataError>;

    /// Fetches a row by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] when the table or row is absent.
    fn get(&self, table: &str, id: &RecordId) -> Result<Record, DataError>;

    /// Inserts a row and returns it with the generated identifier populated.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] for empty or unknown fields.
    fn insert(&self, table: &str, fields: Record) -> Result<Record, DataError>;

    /// Merges the supplied fields into an existing row.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] when no row matches and
    /// [`DataError::Validation`] for unknown fields or identifier changes.
    fn update(&self, table: &str, id: &RecordId, fields: Record) -> Result<Record, DataError>;

    /// Deletes a row; deleting an absent row is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] for unknown tables.
    fn delete(&self, table: &str, id: &RecordId) -> Result<DeleteOutcome, DataError>;

    /// Inserts a row or replaces the fields of the row sharing its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] when the identifier field is missing.
    fn upsert(&self, table: &str, fields: Record) -> Result<Record, DataError>;

    /// Replaces every row of a table atomically.
    ///
    /// # Errors
    ///
    /// Returns a [`DataError`] and leaves the table untouched when any row fails.
    fn replace_all(&self, table: &str, records: Vec<Record>) -> Result<usize, DataError> {
        self.replace_tables(vec![(table.to_string(), records)])
    }

    /// Replaces the rows of several tables in one transaction.
    ///
    /// Tables are cleared in reverse order and then refilled in the given
    /// order, so parents listed before their children survive cascades.
    /// Returns the total number of records written.
    ///
    /// # Errors
    ///
    /// Returns a [`DataError`] and leaves every table untouched when any table
    /// is unknown or any row fails.
    fn replace_tables(&self, tables: Vec<(String, Vec<Record>)>) -> Result<usize, DataError>;
}
