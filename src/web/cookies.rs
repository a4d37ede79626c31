//! Cookie header helpers shared by the flash and CSRF plumbing.

use axum::http::{HeaderMap, HeaderValue, header};
use cookie::Cookie;
use tracing::warn;

/// Returns the decoded value of the named request cookie, if present.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse_encoded)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_owned())
}

/// Appends a percent-encoded `Set-Cookie` header to a response.
pub fn append_set_cookie(headers: &mut HeaderMap, cookie: &Cookie<'_>) {
    match HeaderValue::from_str(&cookie.encoded().to_string()) {
        Ok(value) => {
            headers.append(header::SET_COOKIE, value);
        }
        Err(err) => warn!(cookie = cookie.name(), error = %err, "dropping unencodable cookie"),
    }
}
