// crates/backoffice-store-sqlite/src/users.rs
// ============================================================================
// Module: User Credentials
// Description: Credential lookup and rotation for the `users` table.
// Purpose: Back the login endpoint and the password CLI command.
// Dependencies: backoffice-core, rusqlite
// ============================================================================

//! ## Overview
//! Credential statements are fixed text with bound parameters. The stored
//! secret is returned opaque; verification is the caller's concern.

// ============================================================================
// SECTION: Imports
// ============================================================================

use backoffice_core::DataError;
use rusqlite::OptionalExtension;
use rusqlite::params;

use crate::catalog::db_error;
use crate::catalog::describe_table;
use crate::store::SqliteRecordStore;

// ============================================================================
// SECTION: Statements
// ============================================================================

/// Reads a credential by username.
const FIND_USER_SQL: &str = "SELECT id, username, password FROM users WHERE username = ?1";
/// Creates or rotates a credential.
const UPSERT_USER_SQL: &str = "INSERT INTO users (username, password) VALUES (?1, ?2) ON \
                               CONFLICT(username) DO UPDATE SET password = excluded.password";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Stored credential for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredential {
    /// Numeric user identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Stored secret (`sha256:` digest, salted or not, or legacy plaintext).
    pub secret: String,
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl SqliteRecordStore {
    /// Looks up a credential by username.
    ///
    /// Returns `None` when the user, or the `users` table itself, is absent.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Store`] when the query fails.
    pub fn find_user(&self, username: &str) -> Result<Option<UserCredential>, DataError> {
        self.with_connection(|connection| {
            match describe_table(connection, self.observer_ref(), "users") {
                Ok(_) => {}
                Err(DataError::NotFound(_)) => return Ok(None),
                Err(err) => return Err(err),
            }
            self.observe("find_user", Some("users"), FIND_USER_SQL);
            connection
                .query_row(FIND_USER_SQL, params![username], |row| {
                    Ok(UserCredential {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        secret: row.get(2)?,
                    })
                })
                .optional()
                .map_err(db_error)
        })
    }

    /// Creates a user or replaces an existing user's stored secret.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] when the `users` table is absent.
    pub fn set_user_secret(&self, username: &str, secret: &str) -> Result<(), DataError> {
        if username.trim().is_empty() {
            return Err(DataError::Validation("username required".to_string()));
        }
        self.with_connection(|connection| {
            describe_table(connection, self.observer_ref(), "users")?;
            self.observe("set_user_secret", Some("users"), UPSERT_USER_SQL);
            connection.execute(UPSERT_USER_SQL, params![username, secret]).map_err(db_error)?;
            Ok(())
        })
    }
}
