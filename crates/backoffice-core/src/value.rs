// crates/backoffice-core/src/value.rs
// ============================================================================
// Module: Record Values
// Description: Scalar field values, ordered records, and record identifiers.
// Purpose: Represent one table row as a closed, ordered key-value structure.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Record`] is an ordered mapping from column name to [`FieldValue`].
//! Field values are restricted to a finite scalar union (null, text, integer,
//! float); booleans, arrays, and nested objects are rejected when a record is
//! deserialized so malformed input never reaches the store. Key order follows
//! insertion order, which for rows read from the store is declaration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use crate::interfaces::DataError;

// ============================================================================
// SECTION: Field Values
// ============================================================================

/// Scalar value stored in a single record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// SQL null.
    Null,
    /// Signed 64-bit integer.
    Integer(i64),
    /// Double-precision float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
}

impl FieldValue {
    /// Returns true when the value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text payload when the value is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the integer payload when the value is an integer.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Real(value) => serializer.serialize_f64(*value),
            Self::Text(value) => serializer.serialize_str(value),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

/// Visitor accepting only the scalar value union.
struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("null, string, integer, or float")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        FieldValue::deserialize(deserializer)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(FieldValue::Integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .map(FieldValue::Integer)
            .map_err(|_| E::custom("integer exceeds signed 64-bit range"))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(FieldValue::Real(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(FieldValue::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(FieldValue::Text(value))
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Ordered column-name to value mapping for one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Field entries in insertion order; names are unique.
    entries: Vec<(String, FieldValue)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a field, replacing the value in place when the name already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Builder-style variant of [`Record::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the value for a field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Returns true when the record holds the named field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Visitor that preserves document order and rejects duplicate keys.
struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object of scalar fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut record = Record::new();
        while let Some(key) = access.next_key::<String>()? {
            if record.contains(&key) {
                return Err(de::Error::custom(format!("duplicate field `{key}`")));
            }
            let value = access.next_value::<FieldValue>()?;
            record.entries.push((key, value));
        }
        Ok(record)
    }
}

// ============================================================================
// SECTION: Record Identifiers
// ============================================================================

/// Identifier value addressing a single row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    /// Integer identifier (rowid-backed keys).
    Integer(i64),
    /// Text identifier (text primary keys).
    Text(String),
}

impl RecordId {
    /// Parses a raw identifier from a path or query parameter.
    ///
    /// The text is kept as written; stores convert it to the storage class of
    /// the resolved identifier column.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] when the identifier is blank.
    pub fn parse(raw: &str) -> Result<Self, DataError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DataError::Validation("identifier required".to_string()));
        }
        Ok(Self::Text(trimmed.to_string()))
    }

    /// Converts a field value into an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] for null, float, or blank values.
    pub fn from_field(value: &FieldValue) -> Result<Self, DataError> {
        match value {
            FieldValue::Integer(value) => Ok(Self::Integer(*value)),
            FieldValue::Text(value) if !value.trim().is_empty() => Ok(Self::Text(value.clone())),
            FieldValue::Text(_) | FieldValue::Null | FieldValue::Real(_) => {
                Err(DataError::Validation("identifier must be an integer or text".to_string()))
            }
        }
    }

    /// Returns the identifier as a field value.
    #[must_use]
    pub fn to_field(&self) -> FieldValue {
        match self {
            Self::Integer(value) => FieldValue::Integer(*value),
            Self::Text(value) => FieldValue::Text(value.clone()),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => value.fmt(f),
            Self::Text(value) => value.fmt(f),
        }
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Text(value) => serializer.serialize_str(value),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
