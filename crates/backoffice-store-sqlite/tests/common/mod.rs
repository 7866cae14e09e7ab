// crates/backoffice-store-sqlite/tests/common/mod.rs
// ============================================================================
// Module: SQLite Store Test Support
// Description: Shared fixtures for record store integration tests.
// Purpose: Provide temp-backed stores and a recording statement observer.
// Dependencies: backoffice-store-sqlite, tempfile
// ============================================================================

#![allow(dead_code, reason = "Helpers are shared across test binaries.")]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use backoffice_store_sqlite::SqliteRecordStore;
use backoffice_store_sqlite::SqliteStoreConfig;
use backoffice_store_sqlite::StatementEvent;
use backoffice_store_sqlite::StatementObserver;
use tempfile::TempDir;

/// Observed statement: operation, table, SQL text.
pub type Observed = (String, Option<String>, String);

/// Observer that keeps every statement it sees.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Observed>>,
}

impl RecordingObserver {
    pub fn take(&self) -> Vec<Observed> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl StatementObserver for RecordingObserver {
    fn observe(&self, event: &StatementEvent<'_>) {
        self.events.lock().unwrap().push((
            event.operation.to_string(),
            event.table.map(str::to_string),
            event.sql.to_string(),
        ));
    }
}

pub struct StoreFixture {
    _dir: TempDir,
    pub path: PathBuf,
    pub store: SqliteRecordStore,
    pub observer: Arc<RecordingObserver>,
}

/// Opens a fresh store with the default content schema.
pub fn content_store() -> StoreFixture {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("backoffice.db");
    let observer = Arc::new(RecordingObserver::default());
    let shared: Arc<dyn StatementObserver> = observer.clone();
    let store = SqliteRecordStore::open(&SqliteStoreConfig::at(path.clone()))
        .unwrap()
        .with_observer(shared);
    store.initialize_content_schema().unwrap();
    observer.take();
    StoreFixture {
        _dir: dir,
        path,
        store,
        observer,
    }
}

/// Runs raw DDL against the fixture database through a second connection.
pub fn execute_raw(fixture: &StoreFixture, sql: &str) {
    let connection = rusqlite::Connection::open(&fixture.path).unwrap();
    connection.execute_batch(sql).unwrap();
}
