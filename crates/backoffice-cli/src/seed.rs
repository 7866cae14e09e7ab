// crates/backoffice-cli/src/seed.rs
// ============================================================================
// Module: Seed Files
// Description: JSON seed documents mapping tables to record arrays.
// Purpose: Keep table order from the document so parents seed before children.
// Dependencies: backoffice-core, serde
// ============================================================================

//! ## Overview
//! A seed file is a JSON object whose keys are table names and whose values
//! are arrays of flat records. Tables are reseeded in document order.

use std::fmt;

use backoffice_core::Record;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error as _;
use serde::de::MapAccess;
use serde::de::Visitor;

/// Parsed seed document.
#[derive(Debug, Default)]
pub struct SeedFile {
    /// Tables with their records, in document order.
    tables: Vec<(String, Vec<Record>)>,
}

impl SeedFile {
    /// Returns the tables in document order.
    pub fn into_tables(self) -> Vec<(String, Vec<Record>)> {
        self.tables
    }
}

impl<'de> Deserialize<'de> for SeedFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SeedVisitor)
    }
}

/// Visitor preserving table order.
struct SeedVisitor;

impl<'de> Visitor<'de> for SeedVisitor {
    type Value = SeedFile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object mapping table names to record arrays")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut tables: Vec<(String, Vec<Record>)> = Vec::new();
        while let Some(table) = map.next_key::<String>()? {
            if tables.iter().any(|(existing, _)| *existing == table) {
                return Err(A::Error::custom(format!("duplicate table `{table}`")));
            }
            let records: Vec<Record> = map.next_value()?;
            tables.push((table, records));
        }
        Ok(SeedFile {
            tables,
        })
    }
}
