// crates/backoffice-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Schema catalog and generic record store backed by SQLite.
// Purpose: Perform safe CRUD against arbitrary tables without per-table SQL.
// Dependencies: backoffice-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides the SQLite implementations of
//! [`backoffice_core::SchemaCatalog`] and [`backoffice_core::RecordStore`].
//! Table and column names are resolved against live catalog metadata before
//! any statement text is built; only values travel through parameter
//! binding. Security posture: table names, column names, and values arriving
//! from requests are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bootstrap;
pub mod catalog;
pub mod observer;
mod sql;
pub mod store;
pub mod users;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bootstrap::CONTENT_SCHEMA;
pub use catalog::SqliteSchemaCatalog;
pub use observer::NoopStatementObserver;
pub use observer::StatementEvent;
pub use observer::StatementObserver;
pub use store::SqliteRecordStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use users::UserCredential;
