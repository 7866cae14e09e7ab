// crates/backoffice-server/src/gateway.rs
// ============================================================================
// Module: Request Gateway
// Description: Ordered access-control rules evaluated before routing.
// Purpose: Decide preflight, reject, redirect, or proceed for every request.
// Dependencies: axum, backoffice-config
// ============================================================================

//! ## Overview
//! The gateway classifies a request path, then walks [`RULES`] in order and
//! stops at the first rule that applies. The decision function is pure and
//! takes already-verified session facts, so precedence can be tested without
//! HTTP. [`gateway_layer`] is the axum middleware that gathers those facts,
//! applies the decision, and attaches CORS headers.
//!
//! ## Invariants
//! - API failures are `401` JSON bodies; page failures are silent redirects.
//! - CORS headers only ever echo an origin from the configured allow-list,
//!   except that preflights fall back to the configured default origin.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use backoffice_config::CorsConfig;
use backoffice_config::GatewayConfig;

use crate::audit::HttpRequestEvent;
use crate::audit::HttpRequestEventParams;
use crate::audit::StoreErrorEvent;
use crate::error::ApiError;
use crate::error::InternalDetail;
use crate::server::AppState;
use crate::session::SessionPayload;

// ============================================================================
// SECTION: Request Classes
// ============================================================================

/// Path class assigned before rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Generic table explorer API.
    DataApi,
    /// Login, logout, and session API.
    AuthApi,
    /// Any other API path.
    Api,
    /// Static asset path.
    Public,
    /// Login page.
    LoginPage,
    /// Any other page route.
    Page,
}

impl RequestClass {
    /// Returns the audit label for the class.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DataApi => "data_api",
            Self::AuthApi => "auth_api",
            Self::Api => "api",
            Self::Public => "public",
            Self::LoginPage => "login_page",
            Self::Page => "page",
        }
    }

    /// Returns true for API classes.
    #[must_use]
    pub const fn is_api(self) -> bool {
        matches!(self, Self::DataApi | Self::AuthApi | Self::Api)
    }
}

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Facts about a request the gateway decides on.
#[derive(Debug, Clone, Copy)]
pub struct RequestFacts<'a> {
    /// HTTP method.
    pub method: &'a Method,
    /// Request path without query string.
    pub path: &'a str,
    /// `Origin` header, when present.
    pub origin: Option<&'a str>,
    /// Verified session, when a valid cookie was presented.
    pub session: Option<&'a SessionPayload>,
}

/// Gateway decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayDecision {
    /// Answer the preflight and stop.
    Preflight {
        /// Origin to place in `Access-Control-Allow-Origin`.
        allow_origin: String,
    },
    /// Let the request reach the router.
    Proceed {
        /// Allowed origin to echo on the response.
        cors_origin: Option<String>,
    },
    /// Reject with `401` JSON.
    Unauthorized,
    /// Redirect to the login page.
    RedirectToLogin,
    /// Redirect to the application root.
    RedirectToRoot,
}

impl GatewayDecision {
    /// Returns the audit label for the decision.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Preflight {
                ..
            } => "preflight",
            Self::Proceed {
                ..
            } => "proceed",
            Self::Unauthorized => "unauthorized",
            Self::RedirectToLogin => "redirect_login",
            Self::RedirectToRoot => "redirect_root",
        }
    }
}

/// Decision together with the rule and class that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOutcome {
    /// Rule that matched.
    pub rule: GatewayRule,
    /// Class of the request path.
    pub class: RequestClass,
    /// Resulting decision.
    pub decision: GatewayDecision,
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Access-control rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayRule {
    /// CORS preflight requests.
    Preflight,
    /// Table explorer paths need a session for every method.
    ProtectedDataApi,
    /// Other API paths need a session for mutations only.
    GuardedApi,
    /// Static assets, the login page, and the auth API.
    PublicBypass,
    /// Page routes need a session.
    SessionPage,
}

/// Rules in precedence order; the first applicable rule decides.
pub const RULES: [GatewayRule; 5] = [
    GatewayRule::Preflight,
    GatewayRule::ProtectedDataApi,
    GatewayRule::GuardedApi,
    GatewayRule::PublicBypass,
    GatewayRule::SessionPage,
];

impl GatewayRule {
    /// Returns the audit label for the rule.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preflight => "preflight",
            Self::ProtectedDataApi => "protected_data_api",
            Self::GuardedApi => "guarded_api",
            Self::PublicBypass => "public_bypass",
            Self::SessionPage => "session_page",
        }
    }

    /// Returns a decision when the rule applies to the request.
    fn evaluate(
        self,
        gateway: &Gateway,
        class: RequestClass,
        facts: &RequestFacts<'_>,
    ) -> Option<GatewayDecision> {
        let authenticated = facts.session.is_some();
        match self {
            Self::Preflight => (facts.method == Method::OPTIONS).then(|| {
                GatewayDecision::Preflight {
                    allow_origin: gateway.preflight_origin(facts.origin),
                }
            }),
            Self::ProtectedDataApi => (class == RequestClass::DataApi).then(|| {
                if authenticated {
                    gateway.proceed_api(facts.origin)
                } else {
                    GatewayDecision::Unauthorized
                }
            }),
            Self::GuardedApi => (class == RequestClass::Api).then(|| {
                if authenticated || is_read_method(facts.method) {
                    gateway.proceed_api(facts.origin)
                } else {
                    GatewayDecision::Unauthorized
                }
            }),
            Self::PublicBypass => match class {
                RequestClass::LoginPage if authenticated => Some(GatewayDecision::RedirectToRoot),
                RequestClass::AuthApi => Some(gateway.proceed_api(facts.origin)),
                RequestClass::LoginPage | RequestClass::Public => {
                    Some(GatewayDecision::Proceed {
                        cors_origin: None,
                    })
                }
                _ => None,
            },
            Self::SessionPage => Some(if authenticated {
                GatewayDecision::Proceed {
                    cors_origin: None,
                }
            } else {
                GatewayDecision::RedirectToLogin
            }),
        }
    }
}

/// Returns true for methods that never mutate.
fn is_read_method(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Request gateway configured with paths and CORS policy.
#[derive(Debug, Clone)]
pub struct Gateway {
    /// Path layout.
    paths: GatewayConfig,
    /// CORS policy.
    cors: CorsConfig,
}

impl Gateway {
    /// Creates a gateway from validated configuration.
    #[must_use]
    pub const fn new(paths: GatewayConfig, cors: CorsConfig) -> Self {
        Self {
            paths,
            cors,
        }
    }

    /// Returns the path layout.
    #[must_use]
    pub const fn paths(&self) -> &GatewayConfig {
        &self.paths
    }

    /// Classifies a request path.
    #[must_use]
    pub fn classify(&self, path: &str) -> RequestClass {
        if is_under(path, &self.paths.data_api_prefix) {
            RequestClass::DataApi
        } else if is_under(path, &self.paths.auth_api_prefix) {
            RequestClass::AuthApi
        } else if is_under(path, &self.paths.api_prefix) {
            RequestClass::Api
        } else if self.paths.public_prefixes.iter().any(|prefix| is_under(path, prefix)) {
            RequestClass::Public
        } else if is_under(path, &self.paths.login_page) {
            RequestClass::LoginPage
        } else {
            RequestClass::Page
        }
    }

    /// Evaluates the ordered rules for a request.
    #[must_use]
    pub fn decide(&self, facts: &RequestFacts<'_>) -> GatewayOutcome {
        let class = self.classify(facts.path);
        RULES
            .iter()
            .find_map(|rule| {
                rule.evaluate(self, class, facts).map(|decision| GatewayOutcome {
                    rule: *rule,
                    class,
                    decision,
                })
            })
            .unwrap_or(GatewayOutcome {
                rule: GatewayRule::SessionPage,
                class,
                decision: GatewayDecision::RedirectToLogin,
            })
    }

    /// Returns the origin to echo when it is allow-listed.
    #[must_use]
    pub fn cors_origin(&self, origin: Option<&str>) -> Option<String> {
        origin.filter(|origin| self.cors.is_allowed(origin)).map(str::to_string)
    }

    /// Returns the preflight origin, falling back to the default origin.
    fn preflight_origin(&self, origin: Option<&str>) -> String {
        self.cors_origin(origin).unwrap_or_else(|| self.cors.fallback_origin().to_string())
    }

    /// Builds a proceed decision for an API path.
    fn proceed_api(&self, origin: Option<&str>) -> GatewayDecision {
        GatewayDecision::Proceed {
            cors_origin: self.cors_origin(origin),
        }
    }

    /// Builds the preflight response.
    fn preflight_response(&self, allow_origin: &str) -> Response {
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        insert_header(headers, header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        insert_header(
            headers,
            header::ACCESS_CONTROL_ALLOW_METHODS,
            &self.cors.allowed_methods.join(", "),
        );
        insert_header(
            headers,
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            &self.cors.allowed_headers.join(", "),
        );
        insert_header(headers, header::ACCESS_CONTROL_MAX_AGE, &self.cors.max_age_secs.to_string());
        self.apply_common_cors(headers);
        response
    }

    /// Attaches CORS headers to a proceeding API response.
    fn apply_cors(&self, response: &mut Response, origin: &str) {
        let headers = response.headers_mut();
        insert_header(headers, header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        self.apply_common_cors(headers);
    }

    /// Headers shared by preflight and regular CORS responses.
    fn apply_common_cors(&self, headers: &mut HeaderMap) {
        if self.cors.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        headers.append(header::VARY, HeaderValue::from_static("origin"));
    }
}

/// Returns true when `path` equals `prefix` or sits below it.
fn is_under(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    path.strip_prefix(prefix).is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Inserts a header when the value is representable.
fn insert_header(headers: &mut HeaderMap, name: header::HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Extracts a cookie value by name from the request headers.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find_map(|(key, value)| (key == name).then_some(value))
}

/// Axum middleware applying the gateway to every request.
pub async fn gateway_layer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let session = cookie_value(request.headers(), &state.config.session.cookie_name)
        .and_then(|token| state.codec.verify(token).ok());
    let outcome = state.gateway.decide(&RequestFacts {
        method: &method,
        path: &path,
        origin: origin.as_deref(),
        session: session.as_ref(),
    });

    let response = match &outcome.decision {
        GatewayDecision::Preflight {
            allow_origin,
        } => state.gateway.preflight_response(allow_origin),
        GatewayDecision::Proceed {
            cors_origin,
        } => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            let mut response = next.run(request).await;
            if let Some(cors_origin) = cors_origin {
                state.gateway.apply_cors(&mut response, cors_origin);
            }
            response
        }
        GatewayDecision::Unauthorized => ApiError::Unauthorized.into_response(),
        GatewayDecision::RedirectToLogin => {
            Redirect::temporary(&state.gateway.paths.login_page).into_response()
        }
        GatewayDecision::RedirectToRoot => {
            Redirect::temporary(&state.gateway.paths.app_root).into_response()
        }
    };

    if let Some(detail) = response.extensions().get::<InternalDetail>() {
        state.audit.record_store_error(&StoreErrorEvent::new(
            method.to_string(),
            path.clone(),
            detail.0.clone(),
        ));
    }
    state.audit.record_request(&HttpRequestEvent::new(HttpRequestEventParams {
        method: method.to_string(),
        path,
        class: outcome.class.label(),
        rule: outcome.rule.label(),
        decision: outcome.decision.label(),
        status: response.status().as_u16(),
        origin,
    }));
    response
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
