// crates/backoffice-core/src/schema.rs
// ============================================================================
// Module: Schema Descriptors
// Description: Table and column metadata discovered from the relational store.
// Purpose: Give the record store a verified vocabulary of identifiers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Descriptors are produced fresh by a [`crate::SchemaCatalog`] for every
//! request and are immutable once returned. Table and column names only ever
//! reach query text after being looked up in a descriptor, so the descriptor
//! is the proof that an identifier exists in the store.
//!
//! ## Invariants
//! - Columns keep the declaration order reported by the engine.
//! - Column names are unique within a table.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;

use crate::interfaces::DataError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Conventional identifier column name.
pub const DEFAULT_IDENTIFIER_COLUMN: &str = "id";

// ============================================================================
// SECTION: Column Descriptor
// ============================================================================

/// Metadata for a single declared column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name as declared.
    pub name: String,
    /// Raw declared type name (for example `TEXT` or `INTEGER`).
    pub declared_type: String,
    /// Whether the column accepts nulls.
    pub nullable: bool,
    /// Whether the column is part of the primary key.
    pub is_primary_key: bool,
    /// Declared default expression, if any.
    pub default_value: Option<String>,
}

/// Wire form of a column descriptor for the schema endpoint.
#[derive(Serialize)]
struct ColumnWire<'a> {
    /// Column name.
    name: &'a str,
    /// Declared type.
    #[serde(rename = "type")]
    declared_type: &'a str,
    /// Not-null flag.
    notnull: bool,
    /// Primary key flag.
    pk: bool,
    /// Default expression.
    default: Option<&'a str>,
}

impl Serialize for ColumnDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ColumnWire {
            name: &self.name,
            declared_type: &self.declared_type,
            notnull: !self.nullable,
            pk: self.is_primary_key,
            default: self.default_value.as_deref(),
        }
        .serialize(serializer)
    }
}

// ============================================================================
// SECTION: Table Descriptor
// ============================================================================

/// Metadata for a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    /// Table name as stored in the catalog.
    name: String,
    /// Columns in declaration order.
    columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Creates a descriptor from catalog metadata.
    #[must_use]
    pub const fn new(name: String, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            name,
            columns,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Looks up a column by exact name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns the declared primary key columns.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|column| column.is_primary_key)
    }

    /// Resolves a caller-supplied column name against this table.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] when the column is not declared.
    pub fn require_column(&self, name: &str) -> Result<&ColumnDescriptor, DataError> {
        self.column(name).ok_or_else(|| {
            DataError::Validation(format!("unknown column `{name}` for table `{}`", self.name))
        })
    }
}

// ============================================================================
// SECTION: Identifier Resolution
// ============================================================================

/// Strategy for choosing the identifier column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierPolicy {
    /// Always use the conventional identifier column.
    #[default]
    Conventional,
    /// Use the single declared primary key, falling back to the conventional
    /// column for tables without one (or with a composite key).
    DeclaredPrimaryKey,
}

/// Identifier policy paired with the conventional column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRule {
    /// Resolution strategy.
    pub policy: IdentifierPolicy,
    /// Conventional identifier column name.
    pub column: String,
}

impl Default for IdentifierRule {
    fn default() -> Self {
        Self {
            policy: IdentifierPolicy::Conventional,
            column: DEFAULT_IDENTIFIER_COLUMN.to_string(),
        }
    }
}

impl IdentifierRule {
    /// Creates a rule with the given policy and the default column name.
    #[must_use]
    pub fn with_policy(policy: IdentifierPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Resolves the identifier column for a table.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] when the resolved column is absent.
    pub fn resolve<'a>(
        &self,
        table: &'a TableDescriptor,
    ) -> Result<&'a ColumnDescriptor, DataError> {
        if self.policy == IdentifierPolicy::DeclaredPrimaryKey {
            let mut keys = table.primary_key_columns();
            if let (Some(single), None) = (keys.next(), keys.next()) {
                return Ok(single);
            }
        }
        table.column(&self.column).ok_or_else(|| {
            DataError::Validation(format!(
                "table `{}` has no identifier column `{}`",
                table.name(),
                self.column
            ))
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
