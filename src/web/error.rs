//! Error-to-response mapping for the HTTP layer.

use crate::task::services::TaskServiceError;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Request failures surfaced to the browser as error pages.
#[derive(Debug, Error)]
pub enum WebError {
    /// The path or task identifier names nothing.
    #[error("The page you are looking for could not be found.")]
    NotFound,

    /// The form token is missing or does not match the session token.
    #[error("Your session has expired or the form token is invalid. Reload the page and try again.")]
    Forbidden,

    /// The submitted form exceeds the configured size limit.
    #[error("The submitted form is too large.")]
    PayloadTooLarge,

    /// Input rejected outside of a form re-render.
    #[error("{0}")]
    BadRequest(String),

    /// The request body could not be read as the expected form.
    #[error("{message}")]
    InvalidForm {
        /// Status chosen by the form extractor (415 or 422, usually).
        status: StatusCode,
        /// Extractor explanation.
        message: String,
    },

    /// Persistence, rendering, or other infrastructure failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebError {
    /// Returns the HTTP status reported for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidForm { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message safe to show to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "Something went wrong on our end. Please try again later.".to_owned(),
            other => other.to_string(),
        }
    }
}

impl From<TaskServiceError> for WebError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            err if err.is_not_found() => Self::NotFound,
            TaskServiceError::Validation(err) => Self::BadRequest(err.to_string()),
            TaskServiceError::Repository(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<FormRejection> for WebError {
    fn from(rejection: FormRejection) -> Self {
        Self::InvalidForm {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<minijinja::Error> for WebError {
    fn from(err: minijinja::Error) -> Self {
        Self::Internal(format!("template rendering failed: {err:#}"))
    }
}

/// Marker left on error responses so the error-page layer can render them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    message: String,
}

impl ErrorPage {
    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!(error = %detail, "request failed");
        }
        let message = self.public_message();
        let mut response = (self.status(), message.clone()).into_response();
        response.extensions_mut().insert(ErrorPage { message });
        response
    }
}
