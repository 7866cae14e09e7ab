//! Config defaults tests for backoffice-config.
// crates/backoffice-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Defaults Tests
// Description: Validate default values and collection registry defaults.
// Purpose: Ensure an empty config reproduces the stock content service.
// =============================================================================

#![allow(clippy::use_debug, reason = "Test failure messages include debug output.")]

use backoffice_config::ConfigError;
use backoffice_core::IdentifierPolicy;

mod common;

type TestResult = Result<(), String>;

#[test]
fn default_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn defaults_match_stock_service() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.server.bind != "127.0.0.1:3000" {
        return Err(format!("unexpected bind {}", config.server.bind));
    }
    if config.session.cookie_name != "session" || config.session.ttl_secs != 86_400 {
        return Err("unexpected session defaults".to_string());
    }
    if config.gateway.data_api_prefix != "/api/db" || config.gateway.login_page != "/login" {
        return Err("unexpected gateway defaults".to_string());
    }
    if config.data.identifier_policy != IdentifierPolicy::Conventional {
        return Err("identifier policy should default to conventional".to_string());
    }
    if config.cors.fallback_origin() != "https://joseeugenio.com.br" {
        return Err(format!("unexpected fallback origin {}", config.cors.fallback_origin()));
    }
    if config.cors.allowed_methods.join(", ") != "GET, POST, PUT, DELETE, PATCH, OPTIONS" {
        return Err("unexpected cors methods".to_string());
    }
    Ok(())
}

#[test]
fn default_collections_cover_content_types() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    for name in [
        "projects",
        "services",
        "gallery",
        "media",
        "work-process",
        "faq",
        "bim-features",
        "tech-stack",
        "experience",
        "education",
    ] {
        if config.collection(name).is_none() {
            return Err(format!("missing default collection {name}"));
        }
    }
    let gallery = config.collection("gallery").ok_or("gallery missing")?;
    if gallery.table != "gallery_images" || !gallery.accepts_filter("projectId") {
        return Err("gallery collection misconfigured".to_string());
    }
    let services = config.collection("services").ok_or("services missing")?;
    if services.touch_column.as_deref() != Some("updatedAt") {
        return Err("services should touch updatedAt".to_string());
    }
    let query = services.list_query(false);
    if query.order.len() != 1 || !query.order[0].descending {
        return Err("services should list newest first".to_string());
    }
    Ok(())
}

#[test]
fn gallery_lists_oldest_first_when_filtered_by_project() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    let gallery = config.collection("gallery").ok_or("gallery missing")?;
    let leading_order = |filtered: bool| {
        gallery.list_query(filtered).order.first().map(|key| (key.column.clone(), key.descending))
    };
    if leading_order(false) != Some(("createdAt".to_string(), true)) {
        return Err("unfiltered gallery should list newest first".to_string());
    }
    if leading_order(true) != Some(("createdAt".to_string(), false)) {
        return Err("project gallery should list oldest first".to_string());
    }
    Ok(())
}

#[test]
fn media_collection_is_read_only_and_distinct_by_url() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    let media = config.collection("media").ok_or("media missing")?;
    if media.table != "gallery_images" || !media.read_only {
        return Err("media should be a read-only view of gallery_images".to_string());
    }
    if media.list_query(false).distinct_by.as_deref() != Some("url") {
        return Err("media should collapse repeated urls".to_string());
    }
    Ok(())
}

#[test]
fn explicit_collections_replace_defaults() -> TestResult {
    let config = common::config_from_toml(
        r#"
[[collections]]
name = "testimonials"
table = "testimonials"
order_by = [{ column = "id", descending = true }]
filtered_order_by = [{ column = "id" }]
distinct_by = "author"
read_only = true
"#,
    )
    .map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.collections.len() != 1 || config.collection("services").is_some() {
        return Err("explicit collections should replace defaults".to_string());
    }
    let testimonials = config.collection("testimonials").ok_or("testimonials missing")?;
    if !testimonials.read_only || testimonials.distinct_by.as_deref() != Some("author") {
        return Err("collection options should load from toml".to_string());
    }
    Ok(())
}

#[test]
fn session_secret_required_for_serving() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    match config.require_session_secret() {
        Err(ConfigError::Invalid(message)) if message.contains("session.secret") => Ok(()),
        other => Err(format!("unexpected result {other:?}")),
    }
}

#[test]
fn database_config_converts_to_store_config() -> TestResult {
    let config = common::config_from_toml(
        r#"
[database]
path = "data/site.db"
journal_mode = "delete"
sync_mode = "normal"
busy_timeout_ms = 250
"#,
    )
    .map_err(|err| err.to_string())?;
    let store = config.database.store_config();
    if store.path.to_string_lossy() != "data/site.db" || store.busy_timeout_ms != 250 {
        return Err("store config did not carry database settings".to_string());
    }
    if store.journal_mode.pragma_value() != "delete" || store.sync_mode.pragma_value() != "normal" {
        return Err("store config did not carry pragma modes".to_string());
    }
    Ok(())
}
