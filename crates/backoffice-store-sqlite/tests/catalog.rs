// crates/backoffice-store-sqlite/tests/catalog.rs
// ============================================================================
// Module: Schema Catalog Tests
// Description: Validate runtime table discovery and name verification.
// Purpose: Ensure unknown names fail closed before any table SQL is built.
// Dependencies: backoffice-store-sqlite, backoffice-core, proptest, tempfile
// ============================================================================

//! ## Overview
//! Covers internal-table exclusion, column metadata, and the guarantee that
//! unverified table names never reach generated statement text.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    missing_docs,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use backoffice_core::DataError;
use backoffice_core::Record;
use backoffice_core::RecordId;
use backoffice_core::RecordStore;
use backoffice_core::SchemaCatalog;
use common::content_store;
use common::execute_raw;
use proptest::prelude::*;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn list_tables_excludes_engine_internal_tables() {
    let fixture = content_store();
    let names: Vec<String> = fixture
        .store
        .catalog()
        .list_tables()
        .unwrap()
        .into_iter()
        .map(|table| table.name().to_string())
        .collect();
    assert!(names.contains(&"services".to_string()));
    assert!(names.contains(&"page_content".to_string()));
    assert!(names.iter().all(|name| !name.to_ascii_lowercase().starts_with("sqlite_")));
}

#[test]
fn every_listed_table_describes_with_columns() {
    let fixture = content_store();
    let catalog = fixture.store.catalog();
    for table in catalog.list_tables().unwrap() {
        let described = catalog.describe_table(table.name()).unwrap();
        assert!(!described.columns().is_empty(), "{} has no columns", table.name());
        assert_eq!(described, table);
    }
}

#[test]
fn describe_reports_column_metadata() {
    let fixture = content_store();
    let table = fixture.store.catalog().describe_table("page_content").unwrap();
    let key = table.column("sectionKey").unwrap();
    assert!(key.is_primary_key);
    assert_eq!(key.declared_type, "TEXT");
    let updated = table.column("updatedAt").unwrap();
    assert!(updated.nullable);
    assert_eq!(updated.default_value.as_deref(), Some("CURRENT_TIMESTAMP"));
    let encoded = serde_json::to_value(table.column("content").unwrap()).unwrap();
    assert_eq!(encoded["notnull"], true);
    assert_eq!(encoded["pk"], false);
}

#[test]
fn tables_created_after_startup_are_discovered() {
    let fixture = content_store();
    assert!(matches!(
        fixture.store.catalog().describe_table("testimonials"),
        Err(DataError::NotFound(_))
    ));
    execute_raw(&fixture, "CREATE TABLE testimonials (id INTEGER PRIMARY KEY, quote TEXT);");
    let created =
        fixture.store.insert("testimonials", Record::new().with("quote", "great")).unwrap();
    assert_eq!(created.get("id"), Some(&backoffice_core::FieldValue::Integer(1)));
}

#[test]
fn hostile_table_name_is_rejected_without_side_effects() {
    let fixture = content_store();
    let hostile = "services; DROP TABLE services";
    let outcome = fixture.store.delete(hostile, &RecordId::Integer(1));
    assert!(matches!(outcome, Err(DataError::NotFound(_))));
    for (operation, table, sql) in fixture.observer.take() {
        assert_eq!(operation, "describe_table");
        assert!(table.is_none());
        assert!(!sql.contains(hostile));
    }
    assert!(fixture.store.catalog().describe_table("services").is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn unknown_names_never_produce_table_statements(name in "[a-zA-Z_;'\" ]{1,24}") {
        let fixture = content_store();
        let known = fixture
            .store
            .catalog()
            .list_tables()
            .unwrap()
            .iter()
            .any(|table| table.name() == name);
        prop_assume!(!known);
        fixture.observer.take();
        let outcome = fixture.store.insert(&name, Record::new().with("title", "x"));
        prop_assert!(matches!(outcome, Err(DataError::NotFound(_))));
        let listed = fixture.store.list(&name);
        prop_assert!(matches!(listed, Err(DataError::NotFound(_))));
        for (operation, table, _) in fixture.observer.take() {
            prop_assert_eq!(operation, "describe_table");
            prop_assert!(table.is_none());
        }
    }
}
