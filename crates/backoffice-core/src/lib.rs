// crates/backoffice-core/src/lib.rs
// ============================================================================
// Module: Backoffice Core Library
// Description: Public API surface for the backoffice data-access model.
// Purpose: Expose record types, schema descriptors, and store interfaces.
// Dependencies: crate::{interfaces, query, schema, value}
// ============================================================================

//! ## Overview
//! Backoffice core defines the vocabulary shared by every layer of the
//! content backend: scalar field values, ordered records, table and column
//! descriptors discovered at runtime, and the [`SchemaCatalog`] /
//! [`RecordStore`] interfaces that storage backends implement. It performs no
//! I/O and has no opinion on the relational engine behind the interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod interfaces;
pub mod query;
pub mod schema;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use interfaces::DataError;
pub use interfaces::DeleteOutcome;
pub use interfaces::RecordStore;
pub use interfaces::SchemaCatalog;
pub use query::ListQuery;
pub use query::SortKey;
pub use schema::ColumnDescriptor;
pub use schema::IdentifierPolicy;
pub use schema::IdentifierRule;
pub use schema::TableDescriptor;
pub use value::FieldValue;
pub use value::Record;
pub use value::RecordId;
