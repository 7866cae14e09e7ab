// crates/backoffice-server/tests/common/mod.rs
// ============================================================================
// Module: Server Test Helpers
// Description: Spawns a real back-office server on an ephemeral port.
// Purpose: Drive the gateway and routes through actual HTTP.
// Dependencies: backoffice-server, backoffice-store-sqlite, reqwest, tempfile
// ============================================================================

//! Shared fixtures for HTTP-level server tests.

#![allow(dead_code, reason = "Shared helpers are not used by every test binary.")]
#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only helpers.")]

use std::error::Error;
use std::sync::Arc;
use std::sync::Mutex;

use backoffice_config::BackofficeConfig;
use backoffice_server::AuditSink;
use backoffice_server::BackofficeServer;
use backoffice_server::audit::AuthAuditEvent;
use backoffice_server::audit::HttpRequestEvent;
use backoffice_server::audit::StoreErrorEvent;
use backoffice_server::digest_secret;
use backoffice_store_sqlite::SqliteRecordStore;
use reqwest::Client;
use reqwest::Response;
use reqwest::header::SET_COOKIE;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test result alias.
pub type TestResult = Result<(), Box<dyn Error>>;

/// Session secret used by every fixture.
pub const SECRET: &str = "test-secret-with-at-least-32-bytes!!";
/// Seeded admin username.
pub const ADMIN: &str = "admin";
/// Seeded admin password.
pub const PASSWORD: &str = "correct horse battery staple";
/// Origin present in the default allow-list.
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";
/// Default fallback origin.
pub const FALLBACK_ORIGIN: &str = "https://joseeugenio.com.br";

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded request events.
    pub requests: Mutex<Vec<HttpRequestEvent>>,
    /// Recorded auth events.
    pub auth: Mutex<Vec<AuthAuditEvent>>,
    /// Recorded internal failures.
    pub errors: Mutex<Vec<StoreErrorEvent>>,
}

impl AuditSink for MemoryAuditSink {
    fn record_request(&self, event: &HttpRequestEvent) {
        self.requests.lock().unwrap().push(event.clone());
    }

    fn record_auth(&self, event: &AuthAuditEvent) {
        self.auth.lock().unwrap().push(event.clone());
    }

    fn record_store_error(&self, event: &StoreErrorEvent) {
        self.errors.lock().unwrap().push(event.clone());
    }
}

/// Running server fixture.
pub struct TestServer {
    /// Keeps the database directory alive.
    _dir: TempDir,
    /// Base URL such as `http://127.0.0.1:PORT`.
    pub base: String,
    /// HTTP client that never follows redirects.
    pub client: Client,
    /// Direct store handle for seeding and assertions.
    pub store: SqliteRecordStore,
    /// Captured audit events.
    pub audit: Arc<MemoryAuditSink>,
}

impl TestServer {
    /// Builds an absolute URL for a path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Logs in as the seeded admin and returns the `Cookie` header value.
    pub async fn login(&self) -> Result<String, Box<dyn Error>> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "username": ADMIN, "password": PASSWORD }))
            .send()
            .await?;
        assert_eq!(response.status(), 200);
        session_cookie(&response).ok_or_else(|| "login did not set a cookie".into())
    }
}

/// Extracts `name=value` from the response's `Set-Cookie` header.
pub fn session_cookie(response: &Response) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    header.split(';').next().map(str::to_string)
}

/// Spawns a server with the default configuration on a fresh database.
pub async fn spawn() -> Result<TestServer, Box<dyn Error>> {
    spawn_with(|_| {}).await
}

/// Spawns a server after applying a configuration tweak.
pub async fn spawn_with(
    tweak: impl FnOnce(&mut BackofficeConfig),
) -> Result<TestServer, Box<dyn Error>> {
    let dir = TempDir::new()?;
    let mut config = BackofficeConfig::default();
    config.session.secret = Some(SECRET.to_string());
    config.database.path = dir.path().join("backoffice.db");
    tweak(&mut config);

    let store = SqliteRecordStore::open(&config.database.store_config())?;
    store.initialize_content_schema()?;
    store.set_user_secret(ADMIN, &digest_secret(PASSWORD))?;

    let audit = Arc::new(MemoryAuditSink::default());
    let sink: Arc<dyn AuditSink> = Arc::clone(&audit) as Arc<dyn AuditSink>;
    let server = BackofficeServer::from_parts(config, &store, sink)?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(server.serve_listener(listener));

    let client = Client::builder().redirect(reqwest::redirect::Policy::none()).build()?;
    Ok(TestServer {
        _dir: dir,
        base: format!("http://{addr}"),
        client,
        store,
        audit,
    })
}
