// crates/backoffice-server/tests/gateway_http.rs
// ============================================================================
// Module: Gateway HTTP Tests
// Description: Rejections, redirects, preflights, and CORS headers.
// Purpose: Pin the page-versus-API failure asymmetry end to end.
// Dependencies: backoffice-server, reqwest, tokio
// ============================================================================

//! ## Overview
//! Drives the request gateway through a bound listener: API rejections are
//! `401` JSON, page rejections are bare redirects, and CORS only echoes
//! allow-listed origins.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only assertions.")]

mod common;

use backoffice_core::RecordStore;
use common::ALLOWED_ORIGIN;
use common::FALLBACK_ORIGIN;
use common::TestResult;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::ACCESS_CONTROL_ALLOW_CREDENTIALS;
use reqwest::header::ACCESS_CONTROL_ALLOW_METHODS;
use reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use reqwest::header::COOKIE;
use reqwest::header::LOCATION;
use reqwest::header::ORIGIN;
use serde_json::Value;

#[tokio::test(flavor = "multi_thread")]
async fn protected_api_without_session_is_401_json() -> TestResult {
    let server = common::spawn().await?;
    let response = server.client.get(server.url("/api/db/tables")).send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(LOCATION).is_none());
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "unauthorized");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn page_without_session_redirects_to_login() -> TestResult {
    let server = common::spawn().await?;
    let response = server.client.get(server.url("/dashboard")).send().await?;
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/login");
    assert!(response.bytes().await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn forged_cookie_counts_as_no_session() -> TestResult {
    let server = common::spawn().await?;
    let response = server
        .client
        .get(server.url("/api/db/tables"))
        .header(COOKIE, "session=eyJ1c2VySWQiOjF9.AAAA")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response =
        server.client.get(server.url("/")).header(COOKIE, "session=garbage").send().await?;
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/login");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn public_api_reads_need_no_session() -> TestResult {
    let server = common::spawn().await?;
    let response = server
        .client
        .get(server.url("/api/services"))
        .header(ORIGIN, ALLOWED_ORIGIN)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), ALLOWED_ORIGIN);
    assert_eq!(response.headers().get(ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
    let body: Value = response.json().await?;
    assert_eq!(body, Value::Array(Vec::new()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn public_api_mutations_need_session() -> TestResult {
    let server = common::spawn().await?;
    let response = server
        .client
        .post(server.url("/api/services"))
        .json(&serde_json::json!({ "title": "X", "description": "Y" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(server.store.list("services")?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn preflight_echoes_allowed_origin() -> TestResult {
    let server = common::spawn().await?;
    let response = server
        .client
        .request(Method::OPTIONS, server.url("/api/db/data/services"))
        .header(ORIGIN, ALLOWED_ORIGIN)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), ALLOWED_ORIGIN);
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "GET, POST, PUT, DELETE, PATCH, OPTIONS"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn preflight_from_unknown_origin_gets_fallback() -> TestResult {
    let server = common::spawn().await?;
    let response = server
        .client
        .request(Method::OPTIONS, server.url("/api/projects"))
        .header(ORIGIN, "https://attacker.example")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), FALLBACK_ORIGIN);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_origin_gets_no_cors_on_reads() -> TestResult {
    let server = common::spawn().await?;
    let response = server
        .client
        .get(server.url("/api/faq"))
        .header(ORIGIN, "https://attacker.example")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn static_assets_bypass_the_session_check() -> TestResult {
    let server = common::spawn().await?;
    let response = server.client.get(server.url("/_next/static/app.js")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_api_routes_answer_json_not_found() -> TestResult {
    let server = common::spawn().await?;
    let response = server.client.get(server.url("/api/projects/1/x")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert!(body["error"].as_str().unwrap().contains("/api/projects/1/x"));

    let cookie = server.login().await?;
    let response = server.client.get(server.url("/nowhere")).header(COOKIE, &cookie).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await?, "not found");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn requests_are_audited_with_rule_labels() -> TestResult {
    let server = common::spawn().await?;
    server.client.get(server.url("/dashboard")).send().await?;
    let requests = server.audit.requests.lock().unwrap().clone();
    let event = requests.last().unwrap();
    assert_eq!(event.rule, "session_page");
    assert_eq!(event.decision, "redirect_login");
    assert_eq!(event.class, "page");
    Ok(())
}
