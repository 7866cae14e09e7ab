// crates/backoffice-config/src/lib.rs
// ============================================================================
// Module: Backoffice Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for backoffice.toml semantics.
// Dependencies: backoffice-core, backoffice-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `backoffice-config` defines the configuration model for the back-office
//! service: listener, database, session, CORS, gateway paths, identifier
//! policy, audit, and the collection registry. Validation is strict and
//! fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod collections;
pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use collections::CollectionConfig;
pub use collections::OrderConfig;
pub use collections::default_collections;
pub use config::*;
