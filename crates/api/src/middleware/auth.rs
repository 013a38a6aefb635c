//! Shared static token check.
//!
//! When `BRIDGE_TOKEN` is configured every route except `/health` needs the
//! token, sent as the `x-bridge-token` header or the `bridge_token` cookie.
//! A `?token=` query parameter, or a `token` field in a url-encoded POST
//! body, with the right value is accepted once and answered with the cookie
//! so later requests (including the ones the client engine makes) carry it.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use url::form_urlencoded;

use crate::error::AppError;
use crate::state::AppState;
use crate::views::encode;

pub const TOKEN_HEADER: &str = "x-bridge-token";
pub const TOKEN_COOKIE: &str = "bridge_token";
const TOKEN_QUERY: &str = "token";

/// Largest form body buffered while looking for a token.
const FORM_LIMIT: usize = 2 * 1024 * 1024;

/// Routes reachable without a token.
const PUBLIC_PATHS: &[&str] = &["/health"];

pub async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = state.config.auth_token.as_str();
    if expected.is_empty() || PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    if header_token(request.headers()) == Some(expected)
        || cookie_matches(request.headers(), expected)
    {
        return next.run(request).await;
    }

    if query_token(request.uri().query()).as_deref() == Some(expected) {
        tracing::debug!(path = %request.uri().path(), "Accepted token from query, setting cookie");
        return with_auth_cookie(next.run(request).await, expected);
    }

    if is_form_post(&request) {
        let (parts, body) = request.into_parts();
        let Ok(bytes) = to_bytes(body, FORM_LIMIT).await else {
            tracing::warn!(path = %parts.uri.path(), "Rejected unreadable form body");
            return AppError::Forbidden.into_response();
        };
        if query_token(std::str::from_utf8(&bytes).ok()).as_deref() == Some(expected) {
            tracing::debug!(path = %parts.uri.path(), "Accepted token from form, setting cookie");
            let request = Request::from_parts(parts, Body::from(bytes));
            return with_auth_cookie(next.run(request).await, expected);
        }
        tracing::warn!(path = %parts.uri.path(), "Rejected request without valid token");
        return AppError::Forbidden.into_response();
    }

    tracing::warn!(path = %request.uri().path(), "Rejected request without valid token");
    AppError::Forbidden.into_response()
}

fn with_auth_cookie(mut response: Response, token: &str) -> Response {
    if let Ok(cookie) = HeaderValue::from_str(&auth_cookie(token)) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}

fn is_form_post(request: &Request) -> bool {
    request.method() == Method::POST
        && request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

/// `Set-Cookie` value carrying `token`.
pub fn auth_cookie(token: &str) -> String {
    format!("{TOKEN_COOKIE}={}; Path=/; SameSite=Lax; HttpOnly", encode(token))
}

fn header_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok())
}

/// The cookie is written encoded; accept the raw token too.
fn cookie_matches(headers: &HeaderMap, expected: &str) -> bool {
    let encoded = encode(expected);
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == TOKEN_COOKIE && (value == encoded || value == expected))
}

fn query_token(query: Option<&str>) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == TOKEN_QUERY)
        .map(|(_, value)| value.into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_lookup_handles_multiple_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; bridge_token=s%2Bcret"));
        assert!(cookie_matches(&headers, "s+cret"));
        assert!(!cookie_matches(&headers, "other"));
    }

    #[test]
    fn query_token_is_decoded() {
        assert_eq!(query_token(Some("path=x&token=a%20b")).as_deref(), Some("a b"));
        assert_eq!(query_token(Some("path=x")), None);
        assert_eq!(query_token(None), None);
    }

    #[test]
    fn only_url_encoded_posts_are_buffered() {
        let form = axum::http::Request::post("/actions/global")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
            .body(Body::empty())
            .unwrap();
        let json = axum::http::Request::post("/session/job")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap();
        let get = axum::http::Request::get("/")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::empty())
            .unwrap();
        assert!(is_form_post(&form));
        assert!(!is_form_post(&json));
        assert!(!is_form_post(&get));
    }

    #[test]
    fn cookie_attributes() {
        assert_eq!(
            auth_cookie("t/1"),
            "bridge_token=t%2F1; Path=/; SameSite=Lax; HttpOnly"
        );
    }
}
