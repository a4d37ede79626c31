//! HTTP surface for task tracking.
//!
//! The router maps the conventional task resource routes plus the
//! toggle-complete action onto [`handlers`]. Two layers run before routing:
//! browser form transport (method override and CSRF, see [`transport`]) and
//! error-page rendering for any response marked with an
//! [`error::ErrorPage`].

mod cookies;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod transport;
pub mod views;

use crate::task::{ports::TaskRepository, services::TaskService};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, put};
use axum::Router;
use error::ErrorPage;
use mockable::Clock;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, error};
use views::Views;

/// HTTP-layer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebConfig {
    /// Whether unsafe requests must carry a matching CSRF token.
    pub csrf_protection: bool,
    /// Largest form body buffered for method override and CSRF checks.
    pub max_form_bytes: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            csrf_protection: true,
            max_form_bytes: 64 * 1024,
        }
    }
}

/// Shared handler dependencies.
pub struct AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Task orchestration service.
    pub service: Arc<TaskService<R, C>>,
    /// Compiled page templates.
    pub views: Arc<Views>,
}

impl<R, C> Clone for AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            views: Arc::clone(&self.views),
        }
    }
}

/// Builds the application router.
pub fn router<R, C>(service: TaskService<R, C>, views: Views, config: WebConfig) -> Router
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let views = Arc::new(views);
    let state = AppState {
        service: Arc::new(service),
        views: Arc::clone(&views),
    };

    let routes = Router::new()
        .route("/", get(handlers::root))
        .route(
            "/tasks",
            get(handlers::index::<R, C>).post(handlers::store::<R, C>),
        )
        .route("/tasks/create", get(handlers::create::<R, C>))
        .route(
            "/tasks/{id}",
            get(handlers::show::<R, C>)
                .put(handlers::update::<R, C>)
                .patch(handlers::update::<R, C>)
                .delete(handlers::destroy::<R, C>),
        )
        .route("/tasks/{id}/edit", get(handlers::edit::<R, C>))
        .route(
            "/tasks/{id}/toggle-complete",
            put(handlers::toggle_complete::<R, C>),
        )
        .fallback(handlers::not_found)
        .with_state(state);

    // Method override must happen before routing, so the layers wrap a
    // router whose only service is the route table.
    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn_with_state(
            config,
            transport::form_transport,
        ))
        .layer(middleware::from_fn_with_state(views, render_error_pages))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Replaces the body of marked error responses with the rendered error page.
async fn render_error_pages(
    State(views): State<Arc<Views>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let status = response.status();
    let message = match response.extensions_mut().remove::<ErrorPage>() {
        Some(page) => page.message().to_owned(),
        None if status == StatusCode::METHOD_NOT_ALLOWED => {
            "That action is not available for this page.".to_owned()
        }
        None => return response,
    };

    let reason = status.canonical_reason().unwrap_or("Error");
    match views.error_page(status.as_u16(), reason, &message) {
        Ok(page) => {
            let headers = response.headers_mut();
            headers.remove(header::CONTENT_LENGTH);
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            *response.body_mut() = Body::from(page);
            response
        }
        Err(err) => {
            error!(error = %err, "failed to render error page");
            response
        }
    }
}
