// crates/backoffice-server/tests/data_api.rs
// ============================================================================
// Module: Table Explorer API Tests
// Description: Schema listing and generic CRUD over path-named tables.
// Purpose: Verify status codes and bodies of the data endpoints.
// Dependencies: backoffice-server, reqwest, tokio
// ============================================================================

//! ## Overview
//! Every request here carries a session cookie obtained through the login
//! endpoint, so only data semantics are under test.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only assertions.")]

mod common;

use common::TestResult;
use reqwest::StatusCode;
use reqwest::header::COOKIE;
use serde_json::Value;
use serde_json::json;

#[tokio::test(flavor = "multi_thread")]
async fn schema_lists_tables_with_columns() -> TestResult {
    let server = common::spawn().await?;
    let cookie = server.login().await?;
    let response =
        server.client.get(server.url("/api/db/tables")).header(COOKIE, &cookie).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let tables: Vec<Value> = response.json().await?;
    let services = tables.iter().find(|table| table["name"] == "services").unwrap();
    let id = &services["columns"][0];
    assert_eq!(id["name"], "id");
    assert_eq!(id["type"], "INTEGER");
    assert_eq!(id["pk"], true);
    assert!(tables.iter().all(|table| !table["columns"].as_array().unwrap().is_empty()));
    assert!(tables.iter().all(|table| table["name"] != "sqlite_sequence"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn insert_returns_created_record_with_numeric_id() -> TestResult {
    let server = common::spawn().await?;
    let cookie = server.login().await?;
    let response = server
        .client
        .post(server.url("/api/db/data/services"))
        .header(COOKIE, &cookie)
        .json(&json!({ "title": "X", "description": "Y", "tags": "", "icon": "" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await?;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["title"], "X");

    let rows: Vec<Value> = server
        .client
        .get(server.url("/api/db/data/services"))
        .header(COOKIE, &cookie)
        .send()
        .await?
        .json()
        .await?;
    let row = rows.iter().find(|row| row["id"] == id).unwrap();
    assert_eq!(row["title"], "X");
    assert_eq!(row["description"], "Y");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_merges_fields_by_query_id() -> TestResult {
    let server = common::spawn().await?;
    let cookie = server.login().await?;
    let created: Value = server
        .client
        .post(server.url("/api/db/data/faq"))
        .header(COOKIE, &cookie)
        .json(&json!({ "question": "Q", "answer": "A" }))
        .send()
        .await?
        .json()
        .await?;
    let id = created["id"].as_i64().unwrap();
    let response = server
        .client
        .put(server.url(&format!("/api/db/data/faq?id={id}")))
        .header(COOKIE, &cookie)
        .json(&json!({ "answer": "B" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["record"]["question"], "Q");
    assert_eq!(body["record"]["answer"], "B");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_and_delete_require_id() -> TestResult {
    let server = common::spawn().await?;
    let cookie = server.login().await?;
    let response = server
        .client
        .put(server.url("/api/db/data/faq"))
        .header(COOKIE, &cookie)
        .json(&json!({ "answer": "B" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "id required");
    let response =
        server.client.delete(server.url("/api/db/data/faq")).header(COOKIE, &cookie).send().await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_missing_row_reports_zero_changes() -> TestResult {
    let server = common::spawn().await?;
    let cookie = server.login().await?;
    let response = server
        .client
        .delete(server.url("/api/db/data/services?id=999999"))
        .header(COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "success": true, "changes": 0 }));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_table_is_404() -> TestResult {
    let server = common::spawn().await?;
    let cookie = server.login().await?;
    let response = server
        .client
        .get(server.url("/api/db/data/secrets%22%3B--"))
        .header(COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert!(body["error"].as_str().unwrap().starts_with("not found"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_bodies_are_400() -> TestResult {
    let server = common::spawn().await?;
    let cookie = server.login().await?;
    for body in ["", "{}", "{\"title\":true}", "{\"nope\":1}"] {
        let response = server
            .client
            .post(server.url("/api/db/data/services"))
            .header(COOKIE, &cookie)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn constraint_failure_is_generic_500() -> TestResult {
    let server = common::spawn().await?;
    let cookie = server.login().await?;
    let response = server
        .client
        .post(server.url("/api/db/data/services"))
        .header(COOKIE, &cookie)
        .json(&json!({ "title": "missing description" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "error": "internal server error" }));
    let errors = server.audit.errors.lock().unwrap().clone();
    assert!(errors.iter().any(|event| event.detail.contains("NOT NULL")));
    Ok(())
}
