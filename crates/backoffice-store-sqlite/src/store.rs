// crates/backoffice-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Generic CRUD over arbitrary SQLite tables.
// Purpose: Serve every registered table through one verified code path.
// Dependencies: backoffice-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! [`SqliteRecordStore`] implements [`RecordStore`] for any table present in
//! the catalog. Each operation locks the shared connection, re-describes the
//! target table, and only then builds statement text from the descriptor.
//! Multi-statement operations run inside a single transaction.
//! Security posture: table names, field names, and values are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use backoffice_core::ColumnDescriptor;
use backoffice_core::DataError;
use backoffice_core::DeleteOutcome;
use backoffice_core::IdentifierRule;
use backoffice_core::ListQuery;
use backoffice_core::Record;
use backoffice_core::RecordId;
use backoffice_core::RecordStore;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::SqliteSchemaCatalog;
use crate::catalog::db_error;
use crate::catalog::describe_table;
use crate::observer::NoopStatementObserver;
use crate::observer::StatementEvent;
use crate::observer::StatementObserver;
use crate::sql::VerifiedTable;
use crate::sql::key_value;
use crate::sql::read_record;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode.
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` record store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with defaults for the given path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store setup errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Invalid store configuration.
    #[error("sqlite store invalid config: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for DataError {
    fn from(error: SqliteStoreError) -> Self {
        Self::Store(error.to_string())
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed generic record store.
#[derive(Clone)]
pub struct SqliteRecordStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
    /// Identifier column resolution rule.
    identifier: IdentifierRule,
    /// Receives every statement before it is prepared.
    observer: Arc<dyn StatementObserver>,
}

impl SqliteRecordStore {
    /// Opens a file-backed record store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened.
    pub fn open(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let connection = open_connection(config)?;
        Ok(Self::from_connection(connection))
    }

    /// Opens a private in-memory record store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(Self::from_connection(connection))
    }

    /// Wraps an opened connection with default settings.
    fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
            identifier: IdentifierRule::default(),
            observer: Arc::new(NoopStatementObserver),
        }
    }

    /// Returns a handle sharing this connection with another identifier rule.
    #[must_use]
    pub fn with_identifier_rule(&self, identifier: IdentifierRule) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            identifier,
            observer: Arc::clone(&self.observer),
        }
    }

    /// Replaces the statement observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn StatementObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the identifier rule in effect.
    #[must_use]
    pub const fn identifier_rule(&self) -> &IdentifierRule {
        &self.identifier
    }

    /// Returns a schema catalog sharing this store's connection.
    #[must_use]
    pub fn catalog(&self) -> SqliteSchemaCatalog {
        SqliteSchemaCatalog::new(Arc::clone(&self.connection), Arc::clone(&self.observer))
    }

    /// Runs a closure with the locked connection.
    pub(crate) fn with_connection<T>(
        &self,
        action: impl FnOnce(&mut Connection) -> Result<T, DataError>,
    ) -> Result<T, DataError> {
        let mut guard =
            self.connection.lock().map_err(|_| DataError::Store("mutex poisoned".to_string()))?;
        action(&mut guard)
    }

    /// Reports a statement to the observer.
    pub(crate) fn observe(&self, operation: &'static str, table: Option<&str>, sql: &str) {
        self.observer.observe(&StatementEvent {
            operation,
            table,
            sql,
        });
    }

    /// Returns the statement observer.
    pub(crate) fn observer_ref(&self) -> &dyn StatementObserver {
        self.observer.as_ref()
    }

    /// Resolves a table name against the live catalog.
    fn verify(&self, connection: &Connection, table: &str) -> Result<VerifiedTable, DataError> {
        describe_table(connection, self.observer_ref(), table).map(VerifiedTable::new)
    }

    /// Executes a query and collects its rows as records.
    fn query_records(
        &self,
        connection: &Connection,
        operation: &'static str,
        table: &VerifiedTable,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<Vec<Record>, DataError> {
        self.observe(operation, Some(table.name()), sql);
        let mut statement = connection.prepare(sql).map_err(db_error)?;
        let names: Vec<String> =
            statement.column_names().into_iter().map(ToString::to_string).collect();
        let rows = statement
            .query_map(params_from_iter(values), |row| read_record(row, &names))
            .map_err(db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)?;
        Ok(rows)
    }

    /// Executes a statement and returns the number of changed rows.
    fn execute(
        &self,
        connection: &Connection,
        operation: &'static str,
        table: &VerifiedTable,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<usize, DataError> {
        self.observe(operation, Some(table.name()), sql);
        let mut statement = connection.prepare(sql).map_err(db_error)?;
        statement.execute(params_from_iter(values)).map_err(db_error)
    }

    /// Fetches the first row a single-key statement returns.
    fn fetch(
        &self,
        connection: &Connection,
        table: &VerifiedTable,
        sql: &str,
        key: Value,
    ) -> Result<Option<Record>, DataError> {
        let rows = self.query_records(connection, "get", table, sql, vec![key])?;
        Ok(rows.into_iter().next())
    }

    /// Fetches one row by identifier, failing when absent.
    fn fetch_existing(
        &self,
        connection: &Connection,
        table: &VerifiedTable,
        identifier: &ColumnDescriptor,
        id: &RecordId,
    ) -> Result<Record, DataError> {
        let sql = table.select_by(identifier);
        self.fetch(connection, table, &sql, key_value(identifier, &id.to_field()))?
            .ok_or_else(|| DataError::NotFound(format!("{} `{id}`", table.name())))
    }

    /// Reads back a row written in the current transaction.
    fn fetch_inserted(
        &self,
        connection: &Connection,
        table: &VerifiedTable,
        identifier: &ColumnDescriptor,
        row: InsertedRow,
    ) -> Result<Record, DataError> {
        let (sql, key) = match row {
            InsertedRow::Key(key) => (table.select_by(identifier), key),
            InsertedRow::Rowid(rowid) => (table.select_by_rowid(), Value::Integer(rowid)),
        };
        self.fetch(connection, table, &sql, key)?.ok_or_else(|| {
            DataError::Store(format!("inserted row in `{}` could not be read back", table.name()))
        })
    }

    /// Inserts one record without resolving an identifier.
    fn insert_row(
        &self,
        connection: &Connection,
        table: &VerifiedTable,
        fields: &Record,
    ) -> Result<(), DataError> {
        if fields.is_empty() {
            return Err(DataError::Validation("no fields supplied".to_string()));
        }
        let (columns, values) = table.bind_record(fields)?;
        let sql = table.insert(&columns);
        self.execute(connection, "insert", table, &sql, values)?;
        Ok(())
    }
}

/// Locator for a row written by the current transaction.
enum InsertedRow {
    /// Identifier supplied by the caller, bound as stored.
    Key(Value),
    /// Engine-generated rowid.
    Rowid(i64),
}

impl RecordStore for SqliteRecordStore {
    fn list_where(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>, DataError> {
        self.with_connection(|connection| {
            let table = self.verify(connection, table)?;
            let (sql, values) = table.select(query)?;
            self.query_records(connection, "list", &table, &sql, values)
        })
    }

    fn get(&self, table: &str, id: &RecordId) -> Result<Record, DataError> {
        self.with_connection(|connection| {
            let table = self.verify(connection, table)?;
            let identifier = table.identifier(&self.identifier)?;
            self.fetch_existing(connection, &table, identifier, id)
        })
    }

    fn insert(&self, table: &str, fields: Record) -> Result<Record, DataError> {
        self.with_connection(|connection| {
            let tx = connection.transaction().map_err(db_error)?;
            let table = self.verify(&tx, table)?;
            let identifier = table.identifier(&self.identifier)?;
            self.insert_row(&tx, &table, &fields)?;
            let row = match fields.get(&identifier.name) {
                Some(value) if !value.is_null() => InsertedRow::Key(key_value(identifier, value)),
                _ => InsertedRow::Rowid(tx.last_insert_rowid()),
            };
            let record = self.fetch_inserted(&tx, &table, identifier, row)?;
            tx.commit().map_err(db_error)?;
            Ok(record)
        })
    }

    fn update(&self, table: &str, id: &RecordId, mut fields: Record) -> Result<Record, DataError> {
        self.with_connection(|connection| {
            let tx = connection.transaction().map_err(db_error)?;
            let table = self.verify(&tx, table)?;
            let identifier = table.identifier(&self.identifier)?;
            let key = key_value(identifier, &id.to_field());
            if let Some(supplied) = fields.remove(&identifier.name)
                && key_value(identifier, &supplied) != key
            {
                return Err(DataError::Validation("cannot change identifier".to_string()));
            }
            if fields.is_empty() {
                return Err(DataError::Validation("no fields to update".to_string()));
            }
            let (columns, mut values) = table.bind_record(&fields)?;
            values.push(key);
            let sql = table.update(&columns, identifier);
            let changes = self.execute(&tx, "update", &table, &sql, values)?;
            if changes == 0 {
                return Err(DataError::NotFound(format!("{} `{id}`", table.name())));
            }
            let record = self.fetch_existing(&tx, &table, identifier, id)?;
            tx.commit().map_err(db_error)?;
            Ok(record)
        })
    }

    fn delete(&self, table: &str, id: &RecordId) -> Result<DeleteOutcome, DataError> {
        self.with_connection(|connection| {
            let table = self.verify(connection, table)?;
            let identifier = table.identifier(&self.identifier)?;
            let sql = table.delete(identifier);
            let values = vec![key_value(identifier, &id.to_field())];
            let changes = self.execute(connection, "delete", &table, &sql, values)?;
            Ok(DeleteOutcome {
                changes,
            })
        })
    }

    fn upsert(&self, table: &str, fields: Record) -> Result<Record, DataError> {
        self.with_connection(|connection| {
            let tx = connection.transaction().map_err(db_error)?;
            let table = self.verify(&tx, table)?;
            let identifier = table.identifier(&self.identifier)?;
            let key = match fields.get(&identifier.name) {
                Some(supplied) if !supplied.is_null() => key_value(identifier, supplied),
                _ => {
                    return Err(DataError::Validation(format!(
                        "identifier field `{}` required",
                        identifier.name
                    )));
                }
            };
            let (columns, values) = table.bind_record(&fields)?;
            let sql = table.upsert(&columns, identifier);
            self.execute(&tx, "upsert", &table, &sql, values)?;
            let record = self.fetch_inserted(&tx, &table, identifier, InsertedRow::Key(key))?;
            tx.commit().map_err(db_error)?;
            Ok(record)
        })
    }

    fn replace_tables(&self, tables: Vec<(String, Vec<Record>)>) -> Result<usize, DataError> {
        self.with_connection(|connection| {
            let tx = connection.transaction().map_err(db_error)?;
            let mut verified = Vec::with_capacity(tables.len());
            for (name, records) in &tables {
                verified.push((self.verify(&tx, name)?, records));
            }
            // Children clear before parents; every delete precedes every insert.
            for (table, _) in verified.iter().rev() {
                let sql = table.delete_all();
                self.execute(&tx, "replace", table, &sql, Vec::new())?;
            }
            let mut count = 0;
            for (table, records) in &verified {
                for record in records.iter() {
                    self.insert_row(&tx, table, record)?;
                }
                count += records.len();
            }
            tx.commit().map_err(db_error)?;
            Ok(count)
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with the configured pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies connection pragmas.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}
