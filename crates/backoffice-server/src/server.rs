// crates/backoffice-server/src/server.rs
// ============================================================================
// Module: Backoffice Server
// Description: Router assembly and HTTP serving.
// Purpose: Wire configuration, store, codec, gateway, and audit together.
// Dependencies: axum, backoffice-config, backoffice-store-sqlite, tokio
// ============================================================================

//! ## Overview
//! [`BackofficeServer`] owns the shared [`AppState`] and builds the axum
//! router. The gateway middleware is the outermost layer, so it sees every
//! request (including unmatched ones) before any handler runs.
//! Security posture: the server refuses to start without a session secret.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use backoffice_config::AuditConfig;
use backoffice_config::BackofficeConfig;
use backoffice_core::IdentifierPolicy;
use backoffice_core::IdentifierRule;
use backoffice_store_sqlite::SqliteRecordStore;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::audit::AuditSink;
use crate::audit::AuditStatementObserver;
use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::gateway::Gateway;
use crate::gateway::gateway_layer;
use crate::routes::auth;
use crate::routes::collections;
use crate::routes::data;
use crate::routes::page_content;
use crate::routes::schema;
use crate::routes::shell;
use crate::session::SessionCodec;

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state visible to the gateway and every handler.
pub struct AppState {
    /// Validated configuration.
    pub(crate) config: BackofficeConfig,
    /// Record store using the configured identifier rule.
    pub(crate) store: SqliteRecordStore,
    /// Record store keyed by declared primary keys (page content).
    pub(crate) pages: SqliteRecordStore,
    /// Session token codec.
    pub(crate) codec: SessionCodec,
    /// Request gateway.
    pub(crate) gateway: Gateway,
    /// Audit sink.
    pub(crate) audit: Arc<dyn AuditSink>,
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Back-office HTTP server.
pub struct BackofficeServer {
    /// Shared handler state.
    state: Arc<AppState>,
}

impl BackofficeServer {
    /// Builds a server from configuration, opening the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the store
    /// cannot be opened.
    pub fn from_config(config: BackofficeConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let audit = build_audit_sink(&config.audit)?;
        let mut store = SqliteRecordStore::open(&config.database.store_config())
            .map_err(|err| ServerError::Init(err.to_string()))?;
        if config.audit.log_sql {
            store = store.with_observer(Arc::new(AuditStatementObserver::new(Arc::clone(&audit))));
        }
        Self::from_parts(config, &store, audit)
    }

    /// Builds a server around an existing store and audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when configuration is invalid.
    pub fn from_parts(
        config: BackofficeConfig,
        store: &SqliteRecordStore,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let secret =
            config.require_session_secret().map_err(|err| ServerError::Config(err.to_string()))?;
        let codec = SessionCodec::from_secret(secret);
        let gateway = Gateway::new(config.gateway.clone(), config.cors.clone());
        let pages_rule = IdentifierRule::with_policy(IdentifierPolicy::DeclaredPrimaryKey);
        let pages = store.with_identifier_rule(pages_rule);
        let store = store.with_identifier_rule(config.data.identifier_rule());
        Ok(Self {
            state: Arc::new(AppState {
                config,
                store,
                pages,
                codec,
                gateway,
                audit,
            }),
        })
    }

    /// Builds the axum router with the gateway as the outermost layer.
    #[must_use]
    pub fn router(&self) -> Router {
        let state = Arc::clone(&self.state);
        let paths = state.gateway.paths();
        let data_prefix = &paths.data_api_prefix;
        let auth_prefix = &paths.auth_api_prefix;
        let api_prefix = &paths.api_prefix;
        Router::new()
            .route(&format!("{data_prefix}/tables"), get(schema::list_tables))
            .route(
                &format!("{data_prefix}/data/{{table}}"),
                get(data::list_rows)
                    .post(data::insert_row)
                    .put(data::update_row)
                    .delete(data::delete_row),
            )
            .route(&format!("{auth_prefix}/login"), post(auth::login))
            .route(&format!("{auth_prefix}/logout"), post(auth::logout))
            .route(&format!("{auth_prefix}/session"), get(auth::current_session))
            .route(
                &format!("{api_prefix}/page-content"),
                get(page_content::get_sections).post(page_content::put_section),
            )
            .route(
                &format!("{api_prefix}/{{collection}}"),
                get(collections::list_items).post(collections::create_item),
            )
            .route(
                &format!("{api_prefix}/{{collection}}/{{id}}"),
                get(collections::get_item)
                    .put(collections::update_item)
                    .delete(collections::delete_item),
            )
            .route(&paths.login_page, get(shell::login_page))
            .route(&paths.app_root, get(shell::app_root))
            .fallback(shell::not_found)
            .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
            .layer(middleware::from_fn_with_state(Arc::clone(&state), gateway_layer))
            .with_state(Arc::clone(&state))
    }

    /// Binds the configured address and serves until failure.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr = self
            .state
            .config
            .server
            .bind_addr()
            .map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        self.serve_listener(listener).await
    }

    /// Serves on an already-bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when serving fails.
    pub async fn serve_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the audit sink selected by configuration.
///
/// # Errors
///
/// Returns [`ServerError::Init`] when the audit file cannot be opened.
pub fn build_audit_sink(config: &AuditConfig) -> Result<Arc<dyn AuditSink>, ServerError> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = FileAuditSink::new(Path::new(path))
                .map_err(|err| ServerError::Init(format!("audit log: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization failure.
    #[error("init error: {0}")]
    Init(String),
    /// Transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}
