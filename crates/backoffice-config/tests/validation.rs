//! Validation tests for backoffice-config.
// crates/backoffice-config/tests/validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate fail-closed checks on every config section.
// Purpose: Ensure unsafe or inconsistent settings are rejected.
// =============================================================================

use backoffice_config::BackofficeConfig;
use backoffice_config::CollectionConfig;
use backoffice_config::MIN_SESSION_SECRET_BYTES;

mod common;

type TestResult = Result<(), String>;

fn config() -> Result<BackofficeConfig, String> {
    common::minimal_config().map_err(|err| err.to_string())
}

#[test]
fn short_session_secret_rejected() -> TestResult {
    let mut config = config()?;
    config.session.secret = Some("x".repeat(MIN_SESSION_SECRET_BYTES - 1));
    common::assert_invalid(config.validate(), "session.secret must be at least")?;
    config.session.secret = Some("x".repeat(MIN_SESSION_SECRET_BYTES));
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn zero_ttl_rejected() -> TestResult {
    let mut config = config()?;
    config.session.ttl_secs = 0;
    common::assert_invalid(config.validate(), "session.ttl_secs")
}

#[test]
fn cookie_name_must_be_token() -> TestResult {
    let mut config = config()?;
    config.session.cookie_name = "bad name;".to_string();
    common::assert_invalid(config.validate(), "session.cookie_name")
}

#[test]
fn wildcard_origin_rejected() -> TestResult {
    let mut config = config()?;
    config.cors.allowed_origins = vec!["*".to_string()];
    common::assert_invalid(config.validate(), "explicit origins")
}

#[test]
fn origin_with_path_rejected() -> TestResult {
    let mut config = config()?;
    config.cors.allowed_origins = vec!["https://example.com/admin".to_string()];
    common::assert_invalid(config.validate(), "scheme://host")
}

#[test]
fn empty_origin_list_rejected() -> TestResult {
    let mut config = config()?;
    config.cors.allowed_origins.clear();
    common::assert_invalid(config.validate(), "cors.allowed_origins must be non-empty")
}

#[test]
fn default_origin_must_be_allowed() -> TestResult {
    let mut config = config()?;
    config.cors.default_origin = Some("https://elsewhere.test".to_string());
    common::assert_invalid(config.validate(), "cors.default_origin")?;
    config.cors.default_origin = Some("http://localhost:3000".to_string());
    config.validate().map_err(|err| err.to_string())?;
    if config.cors.fallback_origin() != "http://localhost:3000" {
        return Err("default_origin should override the first allowed origin".to_string());
    }
    Ok(())
}

#[test]
fn bind_must_be_socket_address() -> TestResult {
    let mut config = config()?;
    config.server.bind = "localhost".to_string();
    common::assert_invalid(config.validate(), "server.bind")
}

#[test]
fn zero_body_limit_rejected() -> TestResult {
    let mut config = config()?;
    config.server.max_body_bytes = 0;
    common::assert_invalid(config.validate(), "server.max_body_bytes")
}

#[test]
fn data_prefix_must_nest_under_api_prefix() -> TestResult {
    let mut config = config()?;
    config.gateway.data_api_prefix = "/db".to_string();
    common::assert_invalid(config.validate(), "nested under gateway.api_prefix")
}

#[test]
fn login_page_must_not_be_api_path() -> TestResult {
    let mut config = config()?;
    config.gateway.login_page = "/api/login".to_string();
    common::assert_invalid(config.validate(), "gateway.login_page")
}

#[test]
fn app_root_must_not_collide_with_login_page() -> TestResult {
    let mut config = config()?;
    config.gateway.app_root = "/login".to_string();
    common::assert_invalid(config.validate(), "gateway.app_root")
}

#[test]
fn route_paths_must_be_absolute() -> TestResult {
    let mut config = config()?;
    config.gateway.public_prefixes.push("uploads".to_string());
    common::assert_invalid(config.validate(), "must start with `/`")
}

#[test]
fn empty_identifier_column_rejected() -> TestResult {
    let mut config = config()?;
    config.data.identifier_column = " ".to_string();
    common::assert_invalid(config.validate(), "data.identifier_column")
}

#[test]
fn duplicate_collection_names_rejected() -> TestResult {
    let mut config = config()?;
    let duplicate = config.collection("faq").cloned().ok_or("faq missing")?;
    config.collections.push(duplicate);
    common::assert_invalid(config.validate(), "duplicate collection name")
}

#[test]
fn reserved_collection_names_rejected() -> TestResult {
    for name in ["db", "auth", "page-content"] {
        let mut config = config()?;
        config.collections.push(CollectionConfig::new(name, "faq"));
        common::assert_invalid(config.validate(), "is reserved")?;
    }
    Ok(())
}

#[test]
fn collection_names_must_be_url_segments() -> TestResult {
    let mut config = config()?;
    config.collections.push(CollectionConfig::new("Bad/Name", "faq"));
    common::assert_invalid(config.validate(), "must use lowercase letters")
}

#[test]
fn blank_distinct_column_rejected() -> TestResult {
    let mut config = config()?;
    config.collections.push(CollectionConfig {
        distinct_by: Some(" ".to_string()),
        ..CollectionConfig::new("uploads", "gallery_images")
    });
    common::assert_invalid(config.validate(), "column names must be non-empty")
}
