// crates/backoffice-store-sqlite/src/sql.rs
// ============================================================================
// Module: Statement Builder
// Description: SQL text construction from verified table descriptors.
// Purpose: Confine identifier interpolation to catalog-verified names.
// Dependencies: backoffice-core, base64, rusqlite
// ============================================================================

//! ## Overview
//! [`VerifiedTable`] can only be built from a descriptor returned by the
//! catalog. Every statement builder resolves caller-supplied column names
//! against that descriptor and quotes the descriptor's own spelling; values
//! are emitted as positional placeholders only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use backoffice_core::ColumnDescriptor;
use backoffice_core::DataError;
use backoffice_core::FieldValue;
use backoffice_core::IdentifierRule;
use backoffice_core::ListQuery;
use backoffice_core::Record;
use backoffice_core::TableDescriptor;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rusqlite::Row;
use rusqlite::types::Value;
use rusqlite::types::ValueRef;

// ============================================================================
// SECTION: Verified Table
// ============================================================================

/// Table descriptor confirmed against the live catalog.
pub struct VerifiedTable {
    /// Catalog descriptor.
    descriptor: TableDescriptor,
}

impl VerifiedTable {
    /// Wraps a descriptor returned by the catalog.
    pub const fn new(descriptor: TableDescriptor) -> Self {
        Self {
            descriptor,
        }
    }

    /// Returns the verified table name.
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Resolves the identifier column under the given rule.
    pub fn identifier(&self, rule: &IdentifierRule) -> Result<&ColumnDescriptor, DataError> {
        rule.resolve(&self.descriptor)
    }

    /// Splits a record into verified column names and bound values.
    pub fn bind_record<'a>(
        &'a self,
        fields: &Record,
    ) -> Result<(Vec<&'a ColumnDescriptor>, Vec<Value>), DataError> {
        let mut columns = Vec::with_capacity(fields.len());
        let mut values = Vec::with_capacity(fields.len());
        for (name, value) in fields.iter() {
            columns.push(self.descriptor.require_column(name)?);
            values.push(to_sql_value(value));
        }
        Ok((columns, values))
    }

    /// Builds a filtered, grouped, ordered select statement and its bound values.
    pub fn select(&self, query: &ListQuery) -> Result<(String, Vec<Value>), DataError> {
        let mut sql = format!("SELECT * FROM {}", quote(self.name()));
        let mut values = Vec::with_capacity(query.filters.len());
        for (index, (name, value)) in query.filters.iter().enumerate() {
            let column = self.descriptor.require_column(name)?;
            let keyword = if index == 0 { "WHERE" } else { "AND" };
            let _ = write!(sql, " {keyword} {} = ?{}", quote(&column.name), index + 1);
            values.push(to_sql_value(value));
        }
        if let Some(name) = &query.distinct_by {
            let column = self.descriptor.require_column(name)?;
            let _ = write!(sql, " GROUP BY {}", quote(&column.name));
        }
        for (index, key) in query.order.iter().enumerate() {
            let column = self.descriptor.require_column(&key.column)?;
            let separator = if index == 0 { " ORDER BY" } else { "," };
            let direction = if key.descending { "DESC" } else { "ASC" };
            let _ = write!(sql, "{separator} {} {direction}", quote(&column.name));
        }
        Ok((sql, values))
    }

    /// Builds a select-by-identifier statement.
    pub fn select_by(&self, identifier: &ColumnDescriptor) -> String {
        format!("SELECT * FROM {} WHERE {} = ?1", quote(self.name()), quote(&identifier.name))
    }

    /// Builds a select-by-rowid statement for reading back generated keys.
    pub fn select_by_rowid(&self) -> String {
        format!("SELECT * FROM {} WHERE rowid = ?1", quote(self.name()))
    }

    /// Builds an insert statement for the given columns.
    pub fn insert(&self, columns: &[&ColumnDescriptor]) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(self.name()),
            column_list(columns),
            placeholders(columns.len())
        )
    }

    /// Builds an update statement; the identifier binds last.
    pub fn update(&self, columns: &[&ColumnDescriptor], identifier: &ColumnDescriptor) -> String {
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{} = ?{}", quote(&column.name), index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {assignments} WHERE {} = ?{}",
            quote(self.name()),
            quote(&identifier.name),
            columns.len() + 1
        )
    }

    /// Builds an insert that replaces fields on identifier conflict.
    pub fn upsert(&self, columns: &[&ColumnDescriptor], identifier: &ColumnDescriptor) -> String {
        let updates = columns
            .iter()
            .filter(|column| column.name != identifier.name)
            .map(|column| format!("{0} = excluded.{0}", quote(&column.name)))
            .collect::<Vec<_>>();
        let action = if updates.is_empty() {
            "NOTHING".to_string()
        } else {
            format!("UPDATE SET {}", updates.join(", "))
        };
        format!("{} ON CONFLICT({}) DO {action}", self.insert(columns), quote(&identifier.name))
    }

    /// Builds a delete-by-identifier statement.
    pub fn delete(&self, identifier: &ColumnDescriptor) -> String {
        format!("DELETE FROM {} WHERE {} = ?1", quote(self.name()), quote(&identifier.name))
    }

    /// Builds a statement that clears the table.
    pub fn delete_all(&self) -> String {
        format!("DELETE FROM {}", quote(self.name()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Quotes an identifier, doubling embedded quotes.
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Renders a comma-separated quoted column list.
fn column_list(columns: &[&ColumnDescriptor]) -> String {
    columns.iter().map(|column| quote(&column.name)).collect::<Vec<_>>().join(", ")
}

/// Renders `?1, ?2, ...` placeholders.
fn placeholders(count: usize) -> String {
    (1..=count).map(|index| format!("?{index}")).collect::<Vec<_>>().join(", ")
}

/// Converts a field value into a bindable engine value.
pub fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(value) => Value::Integer(*value),
        FieldValue::Real(value) => Value::Real(*value),
        FieldValue::Text(value) => Value::Text(value.clone()),
    }
}

/// Storage class preference derived from a declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    /// Declared type contains `INT`.
    Integer,
    /// Declared type contains `CHAR`, `CLOB`, or `TEXT`.
    Text,
    /// Any other declared type.
    Other,
}

/// Derives the column affinity the engine applies to a declared type.
pub fn affinity(declared_type: &str) -> Affinity {
    let upper = declared_type.to_ascii_uppercase();
    if upper.contains("INT") {
        Affinity::Integer
    } else if ["CHAR", "CLOB", "TEXT"].iter().any(|marker| upper.contains(marker)) {
        Affinity::Text
    } else {
        Affinity::Other
    }
}

/// Converts an identifier value into the storage class of its column.
///
/// Integer columns accept decimal text as integers; text columns keep the
/// caller's spelling, so `007` never collapses to `7`.
pub fn key_value(column: &ColumnDescriptor, value: &FieldValue) -> Value {
    match (affinity(&column.declared_type), value) {
        (Affinity::Integer, FieldValue::Text(text)) => {
            text.parse::<i64>().map_or_else(|_| Value::Text(text.clone()), Value::Integer)
        }
        (Affinity::Text, FieldValue::Integer(number)) => Value::Text(number.to_string()),
        _ => to_sql_value(value),
    }
}

/// Reads a row into a record keyed by result column names.
pub fn read_record(row: &Row<'_>, names: &[String]) -> rusqlite::Result<Record> {
    let mut record = Record::new();
    for (index, name) in names.iter().enumerate() {
        let value = match row.get_ref(index)? {
            ValueRef::Null => FieldValue::Null,
            ValueRef::Integer(value) => FieldValue::Integer(value),
            ValueRef::Real(value) => FieldValue::Real(value),
            ValueRef::Text(bytes) => FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => FieldValue::Text(STANDARD.encode(bytes)),
        };
        record.set(name.clone(), value);
    }
    Ok(record)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
