// crates/backoffice-store-sqlite/src/observer.rs
// ============================================================================
// Module: Statement Observer
// Description: Hook invoked with every SQL text the store prepares.
// Purpose: Allow audit logging and instrumentation of generated statements.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! Observers see statement text before it is prepared. Statement text never
//! contains values (they are bound), so observers can log it verbatim.

// ============================================================================
// SECTION: Types
// ============================================================================

/// A statement about to be prepared by the store.
#[derive(Debug, Clone, Copy)]
pub struct StatementEvent<'a> {
    /// Store operation label (for example `insert`).
    pub operation: &'static str,
    /// Verified table name, when the statement targets one.
    pub table: Option<&'a str>,
    /// SQL text with positional placeholders.
    pub sql: &'a str,
}

/// Receives statement events from the store.
pub trait StatementObserver: Send + Sync {
    /// Records a statement event.
    fn observe(&self, event: &StatementEvent<'_>);
}

/// Observer that discards every event.
pub struct NoopStatementObserver;

impl StatementObserver for NoopStatementObserver {
    fn observe(&self, _event: &StatementEvent<'_>) {}
}
