// crates/backoffice-config/src/config.rs
// ============================================================================
// Module: Backoffice Configuration
// Description: Configuration loading and validation for the back-office service.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: backoffice-core, backoffice-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section has defaults, so an empty file is a valid development
//! configuration apart from the session secret, which [`BackofficeConfig::require_session_secret`]
//! enforces before serving.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use backoffice_core::IdentifierPolicy;
use backoffice_core::IdentifierRule;
use backoffice_core::schema::DEFAULT_IDENTIFIER_COLUMN;
use backoffice_store_sqlite::SqliteStoreConfig;
use backoffice_store_sqlite::SqliteStoreMode;
use backoffice_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

use crate::collections::CollectionConfig;
use crate::collections::default_collections;
use crate::collections::validate_collections;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "backoffice.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "BACKOFFICE_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default bind address.
const DEFAULT_BIND: &str = "127.0.0.1:3000";
/// Default request body limit.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Hard ceiling for the request body limit.
const MAX_BODY_BYTES_CEILING: usize = 64 * 1024 * 1024;
/// Default database filename.
const DEFAULT_DATABASE_PATH: &str = "backoffice.db";
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Minimum session secret length in bytes.
pub const MIN_SESSION_SECRET_BYTES: usize = 32;
/// Default session lifetime (one day).
const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;
/// Maximum session lifetime (thirty days).
const MAX_SESSION_TTL_SECS: u64 = 30 * 86_400;
/// Default session cookie name.
const DEFAULT_COOKIE_NAME: &str = "session";
/// Default CORS preflight cache lifetime.
const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86_400;
/// Maximum number of allowed origins.
const MAX_ALLOWED_ORIGINS: usize = 64;

// ============================================================================
// SECTION: Root
// ============================================================================

/// Back-office service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackofficeConfig {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session cookie and token configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// CORS allow-list configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Gateway path classification.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Data access configuration.
    #[serde(default)]
    pub data: DataConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// REST collections exposed under the API prefix.
    #[serde(default = "default_collections")]
    pub collections: Vec<CollectionConfig>,
}

impl Default for BackofficeConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            session: SessionConfig::default(),
            cors: CorsConfig::default(),
            gateway: GatewayConfig::default(),
            data: DataConfig::default(),
            audit: AuditConfig::default(),
            collections: default_collections(),
        }
    }
}

impl BackofficeConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then `BACKOFFICE_CONFIG`, then
    /// `backoffice.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.session.validate()?;
        self.cors.validate()?;
        self.gateway.validate()?;
        self.data.validate()?;
        self.audit.validate()?;
        validate_collections(&self.collections, &self.gateway.reserved_segments())
    }

    /// Returns the session secret, failing when it is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `session.secret` is missing.
    pub fn require_session_secret(&self) -> Result<&str, ConfigError> {
        self.session
            .secret
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("session.secret must be set to serve".to_string()))
    }

    /// Looks up a collection by URL segment.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|collection| collection.name == name)
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address is malformed.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|_| {
            ConfigError::Invalid(format!("server.bind `{}` is not a socket address", self.bind))
        })
    }

    /// Validates listener settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_BODY_BYTES_CEILING {
            return Err(ConfigError::Invalid("server.max_body_bytes exceeds limit".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Database
// ============================================================================

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the `SQLite` database file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl DatabaseConfig {
    /// Converts into the store's open configuration.
    #[must_use]
    pub fn store_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }

    /// Validates database settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("database.path", &self.path.to_string_lossy())
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Session cookie and token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret the token signing key is derived from.
    #[serde(default)]
    pub secret: Option<String>,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: u64,
    /// Cookie name carrying the token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Adds the `Secure` attribute to the cookie.
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
            cookie_name: default_cookie_name(),
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    /// Validates session settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(secret) = &self.secret
            && secret.len() < MIN_SESSION_SECRET_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "session.secret must be at least {MIN_SESSION_SECRET_BYTES} bytes"
            )));
        }
        if self.ttl_secs == 0 || self.ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "session.ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}"
            )));
        }
        let valid_name = !self.cookie_name.is_empty()
            && self
                .cookie_name
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-');
        if !valid_name {
            return Err(ConfigError::Invalid(
                "session.cookie_name must be a non-empty token of letters, digits, '_' or '-'"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: CORS
// ============================================================================

/// CORS allow-list configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Explicit origins allowed to receive CORS headers.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Origin returned to preflights from unlisted origins.
    #[serde(default)]
    pub default_origin: Option<String>,
    /// Methods advertised to preflights.
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// Headers advertised to preflights.
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    /// Whether credentials are allowed.
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds.
    #[serde(default = "default_cors_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            default_origin: None,
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            allow_credentials: true,
            max_age_secs: DEFAULT_CORS_MAX_AGE_SECS,
        }
    }
}

impl CorsConfig {
    /// Returns true when the origin is explicitly allowed.
    #[must_use]
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    /// Returns the fallback origin for preflights from unlisted origins.
    #[must_use]
    pub fn fallback_origin(&self) -> &str {
        self.default_origin
            .as_deref()
            .or_else(|| self.allowed_origins.first().map(String::as_str))
            .unwrap_or_default()
    }

    /// Validates CORS settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::Invalid("cors.allowed_origins must be non-empty".to_string()));
        }
        if self.allowed_origins.len() > MAX_ALLOWED_ORIGINS {
            return Err(ConfigError::Invalid("too many cors.allowed_origins".to_string()));
        }
        for origin in &self.allowed_origins {
            validate_origin(origin)?;
        }
        if let Some(default_origin) = &self.default_origin
            && !self.is_allowed(default_origin)
        {
            return Err(ConfigError::Invalid(
                "cors.default_origin must be one of cors.allowed_origins".to_string(),
            ));
        }
        if self.allowed_methods.is_empty() {
            return Err(ConfigError::Invalid("cors.allowed_methods must be non-empty".to_string()));
        }
        let header_values = self.allowed_methods.iter().chain(&self.allowed_headers);
        for value in header_values {
            if value.trim().is_empty() || value.contains([',', '\r', '\n']) {
                return Err(ConfigError::Invalid(format!(
                    "cors method/header entry `{value}` is invalid"
                )));
            }
        }
        Ok(())
    }
}

/// Validates an explicit origin (`scheme://host[:port]`).
fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    if origin == "*" {
        return Err(ConfigError::Invalid(
            "cors.allowed_origins must list explicit origins, not `*`".to_string(),
        ));
    }
    let host = origin.strip_prefix("https://").or_else(|| origin.strip_prefix("http://"));
    let valid = host.is_some_and(|host| {
        !host.is_empty()
            && !host.contains(['/', '?', '#', '*', ' ', ','])
            && host.bytes().all(|byte| byte.is_ascii_graphic())
    });
    if !valid {
        return Err(ConfigError::Invalid(format!(
            "cors origin `{origin}` must be scheme://host[:port] with no path"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Path classification used by the request gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Prefix of every API route.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Prefix of the protected generic table explorer.
    #[serde(default = "default_data_api_prefix")]
    pub data_api_prefix: String,
    /// Prefix of the authentication API.
    #[serde(default = "default_auth_api_prefix")]
    pub auth_api_prefix: String,
    /// Login page path.
    #[serde(default = "default_login_page")]
    pub login_page: String,
    /// Application root path.
    #[serde(default = "default_app_root")]
    pub app_root: String,
    /// Static asset prefixes that bypass authentication.
    #[serde(default = "default_public_prefixes")]
    pub public_prefixes: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_prefix: default_api_prefix(),
            data_api_prefix: default_data_api_prefix(),
            auth_api_prefix: default_auth_api_prefix(),
            login_page: default_login_page(),
            app_root: default_app_root(),
            public_prefixes: default_public_prefixes(),
        }
    }
}

impl GatewayConfig {
    /// Returns the API segments collections may not use.
    fn reserved_segments(&self) -> Vec<&str> {
        let mut reserved = vec!["page-content"];
        for prefix in [&self.data_api_prefix, &self.auth_api_prefix] {
            if let Some(rest) = prefix.strip_prefix(self.api_prefix.as_str())
                && let Some(segment) = rest.trim_start_matches('/').split('/').next()
            {
                reserved.push(segment);
            }
        }
        reserved
    }

    /// Validates gateway paths.
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("gateway.api_prefix", &self.api_prefix),
            ("gateway.data_api_prefix", &self.data_api_prefix),
            ("gateway.auth_api_prefix", &self.auth_api_prefix),
            ("gateway.login_page", &self.login_page),
            ("gateway.app_root", &self.app_root),
        ];
        for (field, value) in fields {
            validate_route_path(field, value)?;
        }
        for prefix in &self.public_prefixes {
            validate_route_path("gateway.public_prefixes", prefix)?;
        }
        if self.api_prefix == "/" {
            return Err(ConfigError::Invalid("gateway.api_prefix must not be `/`".to_string()));
        }
        for (field, value) in [
            ("gateway.data_api_prefix", &self.data_api_prefix),
            ("gateway.auth_api_prefix", &self.auth_api_prefix),
        ] {
            let nested = value
                .strip_prefix(self.api_prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1);
            if !nested {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be nested under gateway.api_prefix"
                )));
            }
        }
        if self.data_api_prefix == self.auth_api_prefix {
            return Err(ConfigError::Invalid(
                "gateway.data_api_prefix and gateway.auth_api_prefix must differ".to_string(),
            ));
        }
        if self.login_page.starts_with(self.api_prefix.as_str()) {
            return Err(ConfigError::Invalid(
                "gateway.login_page must not be under gateway.api_prefix".to_string(),
            ));
        }
        if self.app_root == self.login_page || self.app_root.starts_with(self.api_prefix.as_str()) {
            return Err(ConfigError::Invalid(
                "gateway.app_root must differ from gateway.login_page and sit outside the api"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Validates an absolute route path without a trailing slash.
fn validate_route_path(field: &str, value: &str) -> Result<(), ConfigError> {
    if !value.starts_with('/') {
        return Err(ConfigError::Invalid(format!("{field} must start with `/`")));
    }
    if value.len() > 1 && value.ends_with('/') {
        return Err(ConfigError::Invalid(format!("{field} must not end with `/`")));
    }
    if value.contains(['?', '#', ' ', '*']) || value.contains("//") {
        return Err(ConfigError::Invalid(format!("{field} contains invalid characters")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Data
// ============================================================================

/// Data access configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Identifier column resolution policy.
    #[serde(default)]
    pub identifier_policy: IdentifierPolicy,
    /// Conventional identifier column name.
    #[serde(default = "default_identifier_column")]
    pub identifier_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            identifier_policy: IdentifierPolicy::default(),
            identifier_column: default_identifier_column(),
        }
    }
}

impl DataConfig {
    /// Returns the identifier rule for the record store.
    #[must_use]
    pub fn identifier_rule(&self) -> IdentifierRule {
        IdentifierRule {
            policy: self.identifier_policy,
            column: self.identifier_column.clone(),
        }
    }

    /// Validates data settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.identifier_column.trim().is_empty() {
            return Err(ConfigError::Invalid("data.identifier_column must be set".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Optional JSON-lines file path; stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
    /// Record every SQL statement the store prepares.
    #[serde(default)]
    pub log_sql: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            log_sql: false,
        }
    }
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default request body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Default database path.
fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

/// Default busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Default session lifetime.
const fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

/// Default cookie name.
fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

/// Default allowed origins.
fn default_allowed_origins() -> Vec<String> {
    ["https://joseeugenio.com.br", "https://www.joseeugenio.com.br", "http://localhost:3000"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Default preflight methods.
fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"].into_iter().map(str::to_string).collect()
}

/// Default preflight headers.
fn default_allowed_headers() -> Vec<String> {
    [
        "Content-Type",
        "Authorization",
        "X-CSRF-Token",
        "X-Requested-With",
        "Accept",
        "Accept-Version",
        "Content-Length",
        "Content-MD5",
        "Date",
        "X-Api-Version",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Default preflight cache lifetime.
const fn default_cors_max_age_secs() -> u64 {
    DEFAULT_CORS_MAX_AGE_SECS
}

/// Default API prefix.
fn default_api_prefix() -> String {
    "/api".to_string()
}

/// Default data explorer prefix.
fn default_data_api_prefix() -> String {
    "/api/db".to_string()
}

/// Default auth API prefix.
fn default_auth_api_prefix() -> String {
    "/api/auth".to_string()
}

/// Default login page.
fn default_login_page() -> String {
    "/login".to_string()
}

/// Default application root.
fn default_app_root() -> String {
    "/".to_string()
}

/// Default static asset prefixes.
fn default_public_prefixes() -> Vec<String> {
    ["/_next", "/uploads", "/favicon.ico", "/static"].into_iter().map(str::to_string).collect()
}

/// Default identifier column.
fn default_identifier_column() -> String {
    DEFAULT_IDENTIFIER_COLUMN.to_string()
}

/// Serde default for `true` flags.
const fn default_true() -> bool {
    true
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path using CLI, env, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
