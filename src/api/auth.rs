//! Session gate middleware
//!
//! Checks the session token on every request except login, auth callbacks
//! and health. API callers get a 401; browsers are sent to the login page.
//! Issuing tokens is the login provider's job, not this service's.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;

use crate::AppState;

pub const SESSION_COOKIE: &str = "session";
pub const LOGIN_PATH: &str = "/login";

/// Paths reachable without a session
pub fn is_public_path(path: &str) -> bool {
    path == LOGIN_PATH || path == "/health" || path.starts_with("/api/auth/")
}

/// Token from `Authorization: Bearer` or, failing that, the session cookie
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// Empty token set means auth is disabled and everything passes through.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.session_tokens.is_empty() || is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let authorized = session_token(request.headers())
        .map(|token| state.session_tokens.contains(token))
        .unwrap_or(false);

    if authorized {
        return next.run(request).await;
    }

    let path = request.uri().path();
    if path.starts_with("/api/") {
        log::warn!("Rejected unauthenticated API request: {} {}", request.method(), path);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response()
    } else {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

/// GET /login
///
/// Redirect target for unauthenticated browsers.
pub async fn login_page() -> &'static str {
    "Sign in required. Open this service through the team login to continue."
}
