// crates/backoffice-server/src/gateway/tests.rs
// ============================================================================
// Module: Gateway Unit Tests
// Description: Tests for path classification and rule precedence.
// Purpose: Pin the first-match-wins ordering without an HTTP stack.
// Dependencies: backoffice-server, backoffice-config
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions."
)]

use axum::http::Method;
use backoffice_config::CorsConfig;
use backoffice_config::GatewayConfig;

use super::Gateway;
use super::GatewayDecision;
use super::GatewayRule;
use super::RULES;
use super::RequestClass;
use super::RequestFacts;
use super::cookie_value;
use crate::session::SessionPayload;

const ALLOWED: &str = "https://www.joseeugenio.com.br";
const FALLBACK: &str = "https://joseeugenio.com.br";

fn gateway() -> Gateway {
    Gateway::new(GatewayConfig::default(), CorsConfig::default())
}

fn session() -> SessionPayload {
    SessionPayload::new(1, "admin", 0, u64::MAX / 2)
}

fn decide(
    method: &Method,
    path: &str,
    origin: Option<&str>,
    session: Option<&SessionPayload>,
) -> (GatewayRule, GatewayDecision) {
    let outcome = gateway().decide(&RequestFacts {
        method,
        path,
        origin,
        session,
    });
    (outcome.rule, outcome.decision)
}

#[test]
fn rules_are_ordered_by_precedence() {
    assert_eq!(RULES[0], GatewayRule::Preflight);
    assert_eq!(RULES[4], GatewayRule::SessionPage);
}

#[test]
fn classification_respects_segment_boundaries() {
    let gateway = gateway();
    assert_eq!(gateway.classify("/api/db/tables"), RequestClass::DataApi);
    assert_eq!(gateway.classify("/api/db"), RequestClass::DataApi);
    assert_eq!(gateway.classify("/api/dbx"), RequestClass::Api);
    assert_eq!(gateway.classify("/api/auth/login"), RequestClass::AuthApi);
    assert_eq!(gateway.classify("/api/projects"), RequestClass::Api);
    assert_eq!(gateway.classify("/apiary"), RequestClass::Page);
    assert_eq!(gateway.classify("/_next/static/app.js"), RequestClass::Public);
    assert_eq!(gateway.classify("/favicon.ico"), RequestClass::Public);
    assert_eq!(gateway.classify("/login"), RequestClass::LoginPage);
    assert_eq!(gateway.classify("/dashboard"), RequestClass::Page);
}

#[test]
fn preflight_wins_over_every_other_rule() {
    for path in ["/api/db/tables", "/api/projects", "/dashboard", "/login"] {
        let (rule, decision) = decide(&Method::OPTIONS, path, Some(ALLOWED), None);
        assert_eq!(rule, GatewayRule::Preflight);
        assert_eq!(
            decision,
            GatewayDecision::Preflight {
                allow_origin: ALLOWED.to_string()
            }
        );
    }
}

#[test]
fn preflight_from_unknown_origin_gets_fallback() {
    let (_, decision) = decide(&Method::OPTIONS, "/api/projects", Some("https://evil.test"), None);
    assert_eq!(
        decision,
        GatewayDecision::Preflight {
            allow_origin: FALLBACK.to_string()
        }
    );
    let (_, decision) = decide(&Method::OPTIONS, "/api/projects", None, None);
    assert_eq!(
        decision,
        GatewayDecision::Preflight {
            allow_origin: FALLBACK.to_string()
        }
    );
}

#[test]
fn data_api_requires_session_for_reads_too() {
    let (rule, decision) = decide(&Method::GET, "/api/db/tables", None, None);
    assert_eq!(rule, GatewayRule::ProtectedDataApi);
    assert_eq!(decision, GatewayDecision::Unauthorized);
    let session = session();
    let (_, decision) = decide(&Method::GET, "/api/db/tables", Some(ALLOWED), Some(&session));
    assert_eq!(
        decision,
        GatewayDecision::Proceed {
            cors_origin: Some(ALLOWED.to_string())
        }
    );
}

#[test]
fn guarded_api_leaves_reads_open() {
    for method in [Method::GET, Method::HEAD] {
        let (rule, decision) = decide(&method, "/api/projects", None, None);
        assert_eq!(rule, GatewayRule::GuardedApi);
        assert_eq!(
            decision,
            GatewayDecision::Proceed {
                cors_origin: None
            }
        );
    }
    for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let (_, decision) = decide(&method, "/api/projects", None, None);
        assert_eq!(decision, GatewayDecision::Unauthorized);
    }
}

#[test]
fn unknown_origin_is_not_echoed_on_api_responses() {
    let (_, decision) = decide(&Method::GET, "/api/faq", Some("https://evil.test"), None);
    assert_eq!(
        decision,
        GatewayDecision::Proceed {
            cors_origin: None
        }
    );
}

#[test]
fn auth_api_bypasses_session_checks() {
    let (rule, decision) = decide(&Method::POST, "/api/auth/login", Some(ALLOWED), None);
    assert_eq!(rule, GatewayRule::PublicBypass);
    assert_eq!(
        decision,
        GatewayDecision::Proceed {
            cors_origin: Some(ALLOWED.to_string())
        }
    );
}

#[test]
fn login_page_with_valid_session_redirects_to_root() {
    let session = session();
    let (rule, decision) = decide(&Method::GET, "/login", None, Some(&session));
    assert_eq!(rule, GatewayRule::PublicBypass);
    assert_eq!(decision, GatewayDecision::RedirectToRoot);
    let (_, decision) = decide(&Method::GET, "/login", None, None);
    assert_eq!(
        decision,
        GatewayDecision::Proceed {
            cors_origin: None
        }
    );
}

#[test]
fn pages_redirect_without_session() {
    let (rule, decision) = decide(&Method::GET, "/dashboard", None, None);
    assert_eq!(rule, GatewayRule::SessionPage);
    assert_eq!(decision, GatewayDecision::RedirectToLogin);
    let session = session();
    let (_, decision) = decide(&Method::POST, "/dashboard", None, Some(&session));
    assert_eq!(
        decision,
        GatewayDecision::Proceed {
            cors_origin: None
        }
    );
}

#[test]
fn cookie_value_finds_named_cookie() {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(axum::http::header::COOKIE, "theme=dark; session=abc.def".parse().unwrap());
    assert_eq!(cookie_value(&headers, "session"), Some("abc.def"));
    assert_eq!(cookie_value(&headers, "sess"), None);
}
