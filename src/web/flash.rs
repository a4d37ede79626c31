//! One-time status messages carried across a redirect.
//!
//! A mutating handler attaches [`SetFlash`] to its redirect. The next page
//! that extracts [`Flash`] shows the message and, by returning the same
//! [`Flash`] as part of its response, clears the cookie so the message is
//! never shown twice.

use super::cookies::{append_set_cookie, read_cookie};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use cookie::{Cookie, SameSite};
use std::convert::Infallible;

/// Name of the cookie carrying the pending flash message.
pub const FLASH_COOKIE: &str = "taskboard_flash";

/// Flash message received with the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    message: Option<String>,
}

impl Flash {
    /// Returns the pending message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let message = read_cookie(&parts.headers, FLASH_COOKIE).filter(|text| !text.is_empty());
        Ok(Self { message })
    }
}

impl IntoResponseParts for Flash {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if self.message.is_some() {
            let mut removal = flash_cookie(String::new());
            removal.make_removal();
            append_set_cookie(res.headers_mut(), &removal);
        }
        Ok(res)
    }
}

/// Response part that stores a flash message for the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetFlash(String);

impl SetFlash {
    /// Creates a flash message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl IntoResponseParts for SetFlash {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        append_set_cookie(res.headers_mut(), &flash_cookie(self.0));
        Ok(res)
    }
}

fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
