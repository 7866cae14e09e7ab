// crates/backoffice-server/src/audit.rs
// ============================================================================
// Module: Audit Logging
// Description: Structured audit events for gateway, auth, and store activity.
// Purpose: Emit JSON-line audit logs without hard dependencies.
// Dependencies: backoffice-store-sqlite, serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events are plain serde structs written as one JSON object per line.
//! Sinks decide where lines go: stderr, an append-only file, or nowhere.
//! Events never carry secrets or bound SQL values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use backoffice_store_sqlite::StatementEvent;
use backoffice_store_sqlite::StatementObserver;
use serde::Serialize;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Gateway request audit event.
#[derive(Debug, Clone, Serialize)]
pub struct HttpRequestEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: String,
    /// Request path (no query string).
    pub path: String,
    /// Request class label.
    pub class: &'static str,
    /// Gateway rule that decided the request.
    pub rule: &'static str,
    /// Gateway decision label.
    pub decision: &'static str,
    /// Response status code.
    pub status: u16,
    /// Request origin header, when present.
    pub origin: Option<String>,
}

/// Parameters for building an [`HttpRequestEvent`].
pub struct HttpRequestEventParams {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Request class label.
    pub class: &'static str,
    /// Gateway rule label.
    pub rule: &'static str,
    /// Gateway decision label.
    pub decision: &'static str,
    /// Response status code.
    pub status: u16,
    /// Request origin header.
    pub origin: Option<String>,
}

impl HttpRequestEvent {
    /// Builds a request event stamped with the current time.
    #[must_use]
    pub fn new(params: HttpRequestEventParams) -> Self {
        Self {
            event: "http_request",
            timestamp_ms: now_ms(),
            method: params.method,
            path: params.path,
            class: params.class,
            rule: params.rule,
            decision: params.decision,
            status: params.status,
            origin: params.origin,
        }
    }
}

/// Login and logout audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Action label (`login` or `logout`).
    pub action: &'static str,
    /// Outcome label (`success` or `failure`).
    pub outcome: &'static str,
    /// Username presented, when known.
    pub username: Option<String>,
}

impl AuthAuditEvent {
    /// Builds an auth event stamped with the current time.
    #[must_use]
    pub fn new(action: &'static str, outcome: &'static str, username: Option<String>) -> Self {
        Self {
            event: "auth_event",
            timestamp_ms: now_ms(),
            action,
            outcome,
            username,
        }
    }
}

/// Prepared SQL statement audit event.
#[derive(Debug, Clone, Serialize)]
pub struct SqlStatementEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Store operation label.
    pub operation: &'static str,
    /// Verified table name, when applicable.
    pub table: Option<String>,
    /// Statement text with placeholders.
    pub sql: String,
}

/// Internal failure audit event.
#[derive(Debug, Clone, Serialize)]
pub struct StoreErrorEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Error detail withheld from the client.
    pub detail: String,
}

impl StoreErrorEvent {
    /// Builds a store error event stamped with the current time.
    #[must_use]
    pub fn new(method: String, path: String, detail: String) -> Self {
        Self {
            event: "store_error",
            timestamp_ms: now_ms(),
            method,
            path,
            detail,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for back-office events.
pub trait AuditSink: Send + Sync {
    /// Record a gateway request event.
    fn record_request(&self, event: &HttpRequestEvent);

    /// Record an auth event.
    fn record_auth(&self, _event: &AuthAuditEvent) {}

    /// Record a prepared SQL statement.
    fn record_statement(&self, _event: &SqlStatementEvent) {}

    /// Record an internal failure.
    fn record_store_error(&self, _event: &StoreErrorEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one event line to stderr.
    fn emit(event: &impl Serialize) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

impl AuditSink for StderrAuditSink {
    fn record_request(&self, event: &HttpRequestEvent) {
        Self::emit(event);
    }

    fn record_auth(&self, event: &AuthAuditEvent) {
        Self::emit(event);
    }

    fn record_statement(&self, event: &SqlStatementEvent) {
        Self::emit(event);
    }

    fn record_store_error(&self, event: &StoreErrorEvent) {
        Self::emit(event);
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one event line to the file.
    fn emit(&self, event: &impl Serialize) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_request(&self, event: &HttpRequestEvent) {
        self.emit(event);
    }

    fn record_auth(&self, event: &AuthAuditEvent) {
        self.emit(event);
    }

    fn record_statement(&self, event: &SqlStatementEvent) {
        self.emit(event);
    }

    fn record_store_error(&self, event: &StoreErrorEvent) {
        self.emit(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_request(&self, _event: &HttpRequestEvent) {}
}

// ============================================================================
// SECTION: Statement Observer
// ============================================================================

/// Forwards store statements to an audit sink.
pub struct AuditStatementObserver {
    /// Destination sink.
    sink: Arc<dyn AuditSink>,
}

impl AuditStatementObserver {
    /// Creates an observer writing to the sink.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
        }
    }
}

impl StatementObserver for AuditStatementObserver {
    fn observe(&self, event: &StatementEvent<'_>) {
        self.sink.record_statement(&SqlStatementEvent {
            event: "sql_statement",
            timestamp_ms: now_ms(),
            operation: event.operation,
            table: event.table.map(str::to_string),
            sql: event.sql.to_string(),
        });
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns milliseconds since the unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
