// crates/backoffice-config/src/collections.rs
// ============================================================================
// Module: Collection Registry
// Description: Named REST collections mapped onto store tables.
// Purpose: Describe per-content-type ordering, filters, and timestamps as data.
// Dependencies: backoffice-core, serde
// ============================================================================

//! ## Overview
//! A collection exposes one table under `{api_prefix}/{name}`. The registry
//! replaces hand-written per-resource handlers: ordering, accepted filter
//! parameters, de-duplication, and the touched timestamp column are
//! configuration, and every column named here is still verified against the
//! live catalog per request. Read-only collections answer writes with `405`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use backoffice_core::ListQuery;
use serde::Deserialize;
use serde::Serialize;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of configured collections.
const MAX_COLLECTIONS: usize = 128;
/// Maximum collection name length.
const MAX_COLLECTION_NAME_LENGTH: usize = 64;
/// Maximum ordering keys or filters per collection.
const MAX_COLLECTION_KEYS: usize = 16;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Ordering key for a collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Column to order by.
    pub column: String,
    /// Descending order when true.
    #[serde(default)]
    pub descending: bool,
}

/// One REST collection backed by a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// URL segment under the API prefix.
    pub name: String,
    /// Backing table name.
    pub table: String,
    /// Listing order.
    #[serde(default)]
    pub order_by: Vec<OrderConfig>,
    /// Query parameters accepted as equality filters.
    #[serde(default)]
    pub filters: Vec<String>,
    /// Column stamped with the current UTC time on insert and update.
    #[serde(default)]
    pub touch_column: Option<String>,
    /// Listing order used instead of `order_by` when a filter is applied.
    #[serde(default)]
    pub filtered_order_by: Vec<OrderConfig>,
    /// Column whose repeated values collapse to one listed row.
    #[serde(default)]
    pub distinct_by: Option<String>,
    /// Rejects create, update, and delete when true.
    #[serde(default)]
    pub read_only: bool,
}

impl CollectionConfig {
    /// Creates an unordered, writable collection over a table.
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            order_by: Vec::new(),
            filters: Vec::new(),
            touch_column: None,
            filtered_order_by: Vec::new(),
            distinct_by: None,
            read_only: false,
        }
    }

    /// Builds the base listing query: ordering and de-duplication.
    ///
    /// `filtered` selects `filtered_order_by` when it is configured.
    #[must_use]
    pub fn list_query(&self, filtered: bool) -> ListQuery {
        let order = if filtered && !self.filtered_order_by.is_empty() {
            &self.filtered_order_by
        } else {
            &self.order_by
        };
        let query = order.iter().fold(ListQuery::new(), |query, key| {
            query.order_by(key.column.clone(), key.descending)
        });
        match &self.distinct_by {
            Some(column) => query.distinct_by(column.clone()),
            None => query,
        }
    }

    /// Returns true when the query parameter is an accepted filter.
    #[must_use]
    pub fn accepts_filter(&self, parameter: &str) -> bool {
        self.filters.iter().any(|filter| filter == parameter)
    }

    /// Validates a single collection entry.
    fn validate(&self) -> Result<(), ConfigError> {
        let name = self.name.as_str();
        if name.is_empty() || name.len() > MAX_COLLECTION_NAME_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "collections.name must be 1-{MAX_COLLECTION_NAME_LENGTH} characters"
            )));
        }
        if !name.bytes().all(is_segment_byte) {
            return Err(ConfigError::Invalid(format!(
                "collections.name `{name}` must use lowercase letters, digits, '-' or '_'"
            )));
        }
        if self.table.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("collection `{name}` table must be set")));
        }
        if self.order_by.len() > MAX_COLLECTION_KEYS
            || self.filtered_order_by.len() > MAX_COLLECTION_KEYS
            || self.filters.len() > MAX_COLLECTION_KEYS
        {
            return Err(ConfigError::Invalid(format!(
                "collection `{name}` has too many order_by or filter entries"
            )));
        }
        let blank_order = self
            .order_by
            .iter()
            .chain(&self.filtered_order_by)
            .any(|key| key.column.trim().is_empty());
        let blank_filter = self.filters.iter().any(|filter| filter.trim().is_empty());
        let blank_column = [&self.touch_column, &self.distinct_by]
            .into_iter()
            .flatten()
            .any(|column| column.trim().is_empty());
        if blank_order || blank_filter || blank_column {
            return Err(ConfigError::Invalid(format!(
                "collection `{name}` column names must be non-empty"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Returns true for bytes allowed in a collection URL segment.
const fn is_segment_byte(byte: u8) -> bool {
    byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' || byte == b'_'
}

/// Validates the registry: entry shape, unique names, and reserved segments.
pub(crate) fn validate_collections(
    collections: &[CollectionConfig],
    reserved: &[&str],
) -> Result<(), ConfigError> {
    if collections.len() > MAX_COLLECTIONS {
        return Err(ConfigError::Invalid("too many collections".to_string()));
    }
    let mut seen = BTreeSet::new();
    for collection in collections {
        collection.validate()?;
        if reserved.contains(&collection.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "collection name `{}` is reserved",
                collection.name
            )));
        }
        if !seen.insert(collection.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate collection name `{}`",
                collection.name
            )));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Converts `(column, descending)` pairs into ordering keys.
fn order(keys: &[(&str, bool)]) -> Vec<OrderConfig> {
    keys.iter()
        .map(|(column, descending)| OrderConfig {
            column: (*column).to_string(),
            descending: *descending,
        })
        .collect()
}

/// Builds one default collection entry.
fn collection(
    name: &str,
    table: &str,
    order_by: &[(&str, bool)],
    filters: &[&str],
    touch_column: Option<&str>,
) -> CollectionConfig {
    CollectionConfig {
        order_by: order(order_by),
        filters: filters.iter().map(|filter| (*filter).to_string()).collect(),
        touch_column: touch_column.map(str::to_string),
        ..CollectionConfig::new(name, table)
    }
}

/// Returns the default content collections.
#[must_use]
pub fn default_collections() -> Vec<CollectionConfig> {
    let gallery = CollectionConfig {
        filtered_order_by: order(&[("createdAt", false)]),
        ..collection("gallery", "gallery_images", &[("createdAt", true)], &["projectId"], None)
    };
    let media = CollectionConfig {
        distinct_by: Some("url".to_string()),
        read_only: true,
        ..collection("media", "gallery_images", &[("createdAt", true)], &[], None)
    };
    vec![
        collection("projects", "projects", &[("createdAt", true)], &[], Some("updatedAt")),
        collection("services", "services", &[("createdAt", true)], &[], Some("updatedAt")),
        gallery,
        media,
        collection("work-process", "work_process", &[("num", false)], &[], None),
        collection("faq", "faq", &[("id", false)], &[], None),
        collection("bim-features", "bim_features", &[("id", false)], &[], None),
        collection(
            "tech-stack",
            "tech_stack",
            &[("category", false), ("displayOrder", false)],
            &["category"],
            None,
        ),
        collection("experience", "experience", &[("displayOrder", false)], &[], None),
        collection("education", "education", &[("displayOrder", false)], &[], None),
    ]
}
