//! File loading tests for backoffice-config.
// crates/backoffice-config/tests/load.rs
// =============================================================================
// Module: Config Load Tests
// Description: Validate file-based loading limits and error mapping.
// Purpose: Ensure oversized, non-UTF-8, and malformed files fail closed.
// =============================================================================

#![allow(clippy::use_debug, reason = "Test failure messages include debug output.")]

use std::fs;

use backoffice_config::BackofficeConfig;
use backoffice_config::ConfigError;
use tempfile::TempDir;

type TestResult = Result<(), String>;

#[test]
fn loads_valid_file() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("backoffice.toml");
    fs::write(
        &path,
        "[server]\nbind = \"127.0.0.1:8080\"\n\n[session]\nsecret = \
         \"0123456789abcdef0123456789abcdef\"\n",
    )
    .map_err(|err| err.to_string())?;
    let config = BackofficeConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.server.bind != "127.0.0.1:8080" {
        return Err("bind not loaded".to_string());
    }
    config.require_session_secret().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn missing_file_is_io_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    match BackofficeConfig::load(Some(&dir.path().join("absent.toml"))) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

#[test]
fn malformed_toml_is_parse_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("backoffice.toml");
    fs::write(&path, "[server\nbind = 1").map_err(|err| err.to_string())?;
    match BackofficeConfig::load(Some(&path)) {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {other:?}")),
    }
}

#[test]
fn oversized_file_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("backoffice.toml");
    fs::write(&path, "#".repeat(1024 * 1024 + 1)).map_err(|err| err.to_string())?;
    match BackofficeConfig::load(Some(&path)) {
        Err(ConfigError::Invalid(message)) if message.contains("size limit") => Ok(()),
        other => Err(format!("expected size error, got {other:?}")),
    }
}

#[test]
fn non_utf8_file_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("backoffice.toml");
    fs::write(&path, [0xff_u8, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    match BackofficeConfig::load(Some(&path)) {
        Err(ConfigError::Invalid(message)) if message.contains("utf-8") => Ok(()),
        other => Err(format!("expected utf-8 error, got {other:?}")),
    }
}

#[test]
fn invalid_values_fail_on_load() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("backoffice.toml");
    fs::write(&path, "[cors]\nallowed_origins = [\"*\"]\n").map_err(|err| err.to_string())?;
    match BackofficeConfig::load(Some(&path)) {
        Err(ConfigError::Invalid(_)) => Ok(()),
        other => Err(format!("expected invalid config, got {other:?}")),
    }
}
