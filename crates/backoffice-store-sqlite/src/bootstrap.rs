// crates/backoffice-store-sqlite/src/bootstrap.rs
// ============================================================================
// Module: Content Schema Bootstrap
// Description: DDL for the default site content tables.
// Purpose: Create the tables a fresh back-office database expects.
// Dependencies: rusqlite
// ============================================================================

//! ## Overview
//! The record store is schema-agnostic; this module only exists so a fresh
//! database has the default content tables and the `users` table. Every
//! statement is `CREATE TABLE IF NOT EXISTS`, so running it twice is a no-op.

// ============================================================================
// SECTION: Imports
// ============================================================================

use backoffice_core::DataError;

use crate::catalog::db_error;
use crate::store::SqliteRecordStore;

// ============================================================================
// SECTION: Schema
// ============================================================================

/// DDL for the default content tables.
pub const CONTENT_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    location TEXT,
    year TEXT,
    area TEXT,
    status TEXT,
    softwares TEXT,
    credits TEXT,
    href TEXT NOT NULL UNIQUE,
    meta TEXT NOT NULL,
    imageSrc TEXT,
    imageAlt TEXT,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP,
    updatedAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS gallery_images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    caption TEXT,
    projectId INTEGER REFERENCES projects(id) ON DELETE CASCADE,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS services (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    tags TEXT,
    icon TEXT,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP,
    updatedAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS work_process (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    num TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS faq (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS bim_features (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS page_content (
    sectionKey TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    updatedAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS tech_stack (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    categoryNumber TEXT NOT NULL,
    categoryTitle TEXT NOT NULL,
    categoryQuote TEXT,
    toolName TEXT NOT NULL,
    toolIcon TEXT,
    toolDescription TEXT,
    displayOrder INTEGER DEFAULT 0,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS experience (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    period TEXT NOT NULL,
    title TEXT NOT NULL,
    company TEXT NOT NULL,
    description TEXT,
    displayOrder INTEGER DEFAULT 0,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS education (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    period TEXT NOT NULL,
    title TEXT NOT NULL,
    institution TEXT NOT NULL,
    description TEXT,
    displayOrder INTEGER DEFAULT 0,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
);
";

// ============================================================================
// SECTION: Bootstrap
// ============================================================================

impl SqliteRecordStore {
    /// Creates the default content tables when they are missing.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Store`] when the DDL fails; no table is created
    /// in that case.
    pub fn initialize_content_schema(&self) -> Result<(), DataError> {
        self.with_connection(|connection| {
            let tx = connection.transaction().map_err(db_error)?;
            self.observe("initialize_schema", None, CONTENT_SCHEMA);
            tx.execute_batch(CONTENT_SCHEMA).map_err(db_error)?;
            tx.commit().map_err(db_error)
        })
    }
}
