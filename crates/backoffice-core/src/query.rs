// crates/backoffice-core/src/query.rs
// ============================================================================
// Module: List Queries
// Description: Equality filters and ordering for record listing.
// Purpose: Describe list constraints by column name without SQL text.
// Dependencies: crate::value
// ============================================================================

//! ## Overview
//! A [`ListQuery`] names columns, never SQL fragments. Stores verify every
//! named column against the table descriptor before building a statement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::value::FieldValue;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Ordering key for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column to order by.
    pub column: String,
    /// Descending order when true.
    pub descending: bool,
}

/// Filter and ordering constraints for a list operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Equality filters, combined with AND.
    pub filters: Vec<(String, FieldValue)>,
    /// Ordering keys, applied in sequence.
    pub order: Vec<SortKey>,
    /// Column whose repeated values collapse to a single row.
    pub distinct_by: Option<String>,
}

impl ListQuery {
    /// Creates an unconstrained query.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filters: Vec::new(),
            order: Vec::new(),
            distinct_by: None,
        }
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Adds an ordering key.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.order.push(SortKey {
            column: column.into(),
            descending,
        });
        self
    }

    /// Keeps one row per distinct value of a column.
    #[must_use]
    pub fn distinct_by(mut self, column: impl Into<String>) -> Self {
        self.distinct_by = Some(column.into());
        self
    }

    /// Returns true when the query has no constraints.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.filters.is_empty() && self.order.is_empty() && self.distinct_by.is_none()
    }
}
