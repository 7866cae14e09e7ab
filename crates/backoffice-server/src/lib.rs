// crates/backoffice-server/src/lib.rs
// ============================================================================
// Module: Backoffice Server Library
// Description: HTTP service for the content back office.
// Purpose: Expose the generic data engine behind a single request gateway.
// Dependencies: axum, backoffice-core, backoffice-store-sqlite, ed25519-dalek
// ============================================================================

//! ## Overview
//! Every inbound request passes through the [`gateway`] before routing: it
//! answers CORS preflights, verifies the session cookie with the
//! [`session`] codec, and either rejects, redirects, or lets the request
//! reach the [`routes`]. Route handlers never build SQL; they call the
//! generic record store with table names taken from the path or from the
//! collection registry.
//! Security posture: all request inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod server;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use credentials::digest_secret;
pub use credentials::verify_secret;
pub use error::ApiError;
pub use gateway::Gateway;
pub use gateway::GatewayDecision;
pub use gateway::GatewayRule;
pub use gateway::RequestClass;
pub use gateway::RequestFacts;
pub use server::BackofficeServer;
pub use server::ServerError;
pub use server::build_audit_sink;
pub use session::SessionCodec;
pub use session::SessionError;
pub use session::SessionPayload;
