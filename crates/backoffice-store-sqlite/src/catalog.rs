// crates/backoffice-store-sqlite/src/catalog.rs
// ============================================================================
// Module: SQLite Schema Catalog
// Description: Runtime table and column discovery from SQLite metadata.
// Purpose: Provide the only source of identifiers allowed into SQL text.
// Dependencies: backoffice-core, rusqlite
// ============================================================================

//! ## Overview
//! Metadata queries use fixed statement text and bind the table name as a
//! parameter, so looking up an unknown or hostile name never places that
//! name into SQL. Engine-internal tables (`sqlite_` prefix) are excluded.
//! Nothing is cached: every lookup re-reads the engine catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use backoffice_core::ColumnDescriptor;
use backoffice_core::DataError;
use backoffice_core::SchemaCatalog;
use backoffice_core::TableDescriptor;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

use crate::observer::StatementEvent;
use crate::observer::StatementObserver;

// ============================================================================
// SECTION: Statements
// ============================================================================

/// Lists user table names.
const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT \
                               LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name";
/// Confirms a user table exists.
const TABLE_EXISTS_SQL: &str = "SELECT name FROM sqlite_master WHERE type = 'table' AND name = \
                                ?1 AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'";
/// Reads declared columns for a table.
const TABLE_INFO_SQL: &str = "SELECT name, type, \"notnull\", dflt_value, pk FROM \
                              pragma_table_info(?1) ORDER BY cid";

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Schema catalog sharing the record store's connection.
#[derive(Clone)]
pub struct SqliteSchemaCatalog {
    /// Shared `SQLite` connection.
    connection: Arc<Mutex<Connection>>,
    /// Statement observer.
    observer: Arc<dyn StatementObserver>,
}

impl SqliteSchemaCatalog {
    /// Creates a catalog over an existing connection.
    pub(crate) fn new(
        connection: Arc<Mutex<Connection>>,
        observer: Arc<dyn StatementObserver>,
    ) -> Self {
        Self {
            connection,
            observer,
        }
    }
}

impl SchemaCatalog for SqliteSchemaCatalog {
    fn list_tables(&self) -> Result<Vec<TableDescriptor>, DataError> {
        let guard =
            self.connection.lock().map_err(|_| DataError::Store("mutex poisoned".to_string()))?;
        list_tables(&guard, self.observer.as_ref())
    }

    fn describe_table(&self, name: &str) -> Result<TableDescriptor, DataError> {
        let guard =
            self.connection.lock().map_err(|_| DataError::Store("mutex poisoned".to_string()))?;
        describe_table(&guard, self.observer.as_ref(), name)
    }
}

// ============================================================================
// SECTION: Metadata Queries
// ============================================================================

/// Lists every user table with its columns.
pub(crate) fn list_tables(
    connection: &Connection,
    observer: &dyn StatementObserver,
) -> Result<Vec<TableDescriptor>, DataError> {
    observer.observe(&StatementEvent {
        operation: "list_tables",
        table: None,
        sql: LIST_TABLES_SQL,
    });
    let mut statement = connection.prepare(LIST_TABLES_SQL).map_err(db_error)?;
    let names = statement
        .query_map(params![], |row| row.get::<_, String>(0))
        .map_err(db_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(db_error)?;
    names.into_iter().map(|name| read_columns(connection, observer, name)).collect()
}

/// Describes one table, failing with not-found when it is absent.
pub(crate) fn describe_table(
    connection: &Connection,
    observer: &dyn StatementObserver,
    name: &str,
) -> Result<TableDescriptor, DataError> {
    observer.observe(&StatementEvent {
        operation: "describe_table",
        table: None,
        sql: TABLE_EXISTS_SQL,
    });
    let stored: Option<String> = connection
        .query_row(TABLE_EXISTS_SQL, params![name], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    let Some(stored) = stored else {
        return Err(DataError::NotFound(format!("table `{name}`")));
    };
    read_columns(connection, observer, stored)
}

/// Reads column metadata for a table known to exist.
fn read_columns(
    connection: &Connection,
    observer: &dyn StatementObserver,
    name: String,
) -> Result<TableDescriptor, DataError> {
    observer.observe(&StatementEvent {
        operation: "describe_table",
        table: None,
        sql: TABLE_INFO_SQL,
    });
    let mut statement = connection.prepare(TABLE_INFO_SQL).map_err(db_error)?;
    let columns = statement
        .query_map(params![name], |row| {
            let not_null: i64 = row.get(2)?;
            let pk_position: i64 = row.get(4)?;
            Ok(ColumnDescriptor {
                name: row.get(0)?,
                declared_type: row.get(1)?,
                nullable: not_null == 0,
                is_primary_key: pk_position > 0,
                default_value: row.get(3)?,
            })
        })
        .map_err(db_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(db_error)?;
    if columns.is_empty() {
        return Err(DataError::NotFound(format!("table `{name}`")));
    }
    Ok(TableDescriptor::new(name, columns))
}

/// Maps engine errors into store errors.
pub(crate) fn db_error(err: rusqlite::Error) -> DataError {
    DataError::Store(err.to_string())
}
