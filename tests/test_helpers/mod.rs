//! Shared HTTP harness for integration tests.
//!
//! Requests are driven through the full router with `tower::ServiceExt`, so
//! method override, CSRF checks, and error-page rendering all apply.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use std::sync::Arc;
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository, domain::Task, ports::TaskRepository,
    services::TaskService,
};
use taskboard::web::{self, WebConfig, views::Views};
use tower::ServiceExt;

/// Token placed in both the CSRF cookie and the form field.
pub const TOKEN: &str = "test-token";

/// Router plus a handle on the store behind it.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
    repository: InMemoryTaskRepository,
}

/// Buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// `Location` header of a redirect.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// Every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect()
    }

    /// The `name=value` pair set for cookie `name`, ready to send back.
    pub fn cookie_pair(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies()
            .into_iter()
            .find(|value| value.starts_with(&prefix))
            .and_then(|value| value.split(';').next())
            .map(str::to_owned)
    }
}

impl TestApp {
    /// App with default settings and an empty in-memory store.
    pub fn new() -> Self {
        Self::with_config(WebConfig::default())
    }

    /// App with the given HTTP settings.
    pub fn with_config(config: WebConfig) -> Self {
        let repository = InMemoryTaskRepository::new();
        let service = TaskService::new(
            Arc::new(repository.clone()),
            Arc::new(mockable::DefaultClock),
        );
        let views = Views::new().expect("templates compile");
        Self {
            router: web::router(service, views, config),
            repository,
        }
    }

    /// Every stored task in creation order.
    pub async fn tasks(&self) -> Vec<Task> {
        self.repository.list().await.expect("list tasks")
    }

    /// Sends a raw request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET path` with no cookies.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_with_cookie(path, None).await
    }

    /// `GET path`, optionally sending a cookie pair.
    pub async fn get_with_cookie(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::get(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    /// Browser form `POST` carrying a valid CSRF token.
    pub async fn submit(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let mut fields = fields.to_vec();
        fields.push(("_token", TOKEN));
        self.post_form(path, &fields, Some(TOKEN), None).await
    }

    /// Browser form `POST` with explicit cookie token and referer.
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        cookie_token: Option<&str>,
        referer: Option<&str>,
    ) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).expect("encode form");
        let mut builder = Request::post(path).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(token) = cookie_token {
            builder = builder.header(header::COOKIE, format!("taskboard_csrf={token}"));
        }
        if let Some(referer) = referer {
            builder = builder.header(header::REFERER, referer);
        }
        self.send(builder.body(Body::from(body)).expect("valid request"))
            .await
    }

    /// Creates a task through the form and returns the stored record.
    pub async fn create_task(&self, title: &str) -> Task {
        let response = self.submit("/tasks", &[("title", title)]).await;
        assert_eq!(response.status, StatusCode::FOUND, "create should redirect");
        self.tasks()
            .await
            .into_iter()
            .rev()
            .find(|task| task.title().as_str() == title.trim())
            .expect("created task is stored")
    }
}
