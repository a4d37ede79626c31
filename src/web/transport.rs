//! Browser form transport: method override and CSRF verification.
//!
//! HTML forms can only `POST`, so a hidden `_method` field selects the verb
//! the request is routed as. Unsafe requests must echo the token from the
//! CSRF cookie (double-submit) as a `_token` field or `X-CSRF-Token` header.

use super::WebConfig;
use super::cookies::{append_set_cookie, read_cookie};
use super::error::WebError;
use axum::body::{Body, Bytes, to_bytes};
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use cookie::{Cookie, SameSite};
use std::convert::Infallible;
use tracing::warn;
use uuid::Uuid;

/// Name of the cookie carrying the CSRF token.
pub const CSRF_COOKIE: &str = "taskboard_csrf";
/// Header accepted in place of the `_token` form field.
pub const CSRF_HEADER: &str = "x-csrf-token";
/// Form field carrying the CSRF token.
pub const TOKEN_FIELD: &str = "_token";
/// Form field selecting the routed method of a `POST`.
pub const METHOD_FIELD: &str = "_method";

/// CSRF token to embed in rendered forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_default())
    }
}

/// Applies method override and CSRF verification before routing.
pub async fn form_transport(
    State(config): State<WebConfig>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let cookie_token = read_cookie(&parts.headers, CSRF_COOKIE).filter(|token| !token.is_empty());

    if is_safe(&parts.method) {
        let issued = cookie_token.is_none();
        let token = cookie_token.unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        parts.extensions.insert(CsrfToken(token.clone()));
        let mut response = next.run(Request::from_parts(parts, body)).await;
        if issued {
            append_set_cookie(response.headers_mut(), &csrf_cookie(token));
        }
        return response;
    }

    let (body, fields) = if is_form(&parts.headers) {
        let bytes = match to_bytes(body, config.max_form_bytes).await {
            Ok(bytes) => bytes,
            Err(_) => return WebError::PayloadTooLarge.into_response(),
        };
        let fields = parse_fields(&bytes);
        (Body::from(bytes), fields)
    } else {
        (body, Vec::new())
    };

    if parts.method == Method::POST
        && let Some(method) = overridden_method(&fields)
    {
        parts.method = method;
    }

    if config.csrf_protection {
        let submitted = field(&fields, TOKEN_FIELD).or_else(|| {
            parts
                .headers
                .get(CSRF_HEADER)
                .and_then(|value| value.to_str().ok())
        });
        if !tokens_match(cookie_token.as_deref(), submitted) {
            warn!(method = %parts.method, path = %parts.uri.path(), "rejecting request with invalid CSRF token");
            return WebError::Forbidden.into_response();
        }
    }

    if let Some(token) = cookie_token {
        parts.extensions.insert(CsrfToken(token));
    }
    next.run(Request::from_parts(parts, body)).await
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

fn parse_fields(bytes: &Bytes) -> Vec<(String, String)> {
    serde_urlencoded::from_bytes(bytes).unwrap_or_default()
}

fn field<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn overridden_method(fields: &[(String, String)]) -> Option<Method> {
    let requested = field(fields, METHOD_FIELD)?.trim().to_ascii_uppercase();
    match requested.as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

fn tokens_match(expected: Option<&str>, submitted: Option<&str>) -> bool {
    match (expected, submitted) {
        (Some(expected), Some(submitted)) => constant_time_eq(expected, submitted),
        _ => false,
    }
}

fn constant_time_eq(left: &str, right: &str) -> bool {
    left.len() == right.len()
        && left
            .bytes()
            .zip(right.bytes())
            .fold(0_u8, |acc, (l, r)| acc | (l ^ r))
            == 0
}

fn csrf_cookie(token: String) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE, token))
        .path("/")
        .same_site(SameSite::Strict)
        .build()
}
