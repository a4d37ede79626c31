//! Request handlers for the task pages.

use super::AppState;
use super::error::WebError;
use super::flash::{Flash, SetFlash};
use super::transport::CsrfToken;
use super::views::TaskForm;
use crate::task::{
    domain::TaskId,
    ports::TaskRepository,
    services::{CreateTaskRequest, TaskServiceError, UpdateTaskRequest},
};
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use mockable::Clock;
use serde::Deserialize;

const TASKS_PATH: &str = "/tasks";

/// Submitted create/edit form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl TaskInput {
    fn create_request(&self) -> CreateTaskRequest {
        let request = CreateTaskRequest::new(self.title.clone());
        match &self.description {
            Some(description) => request.with_description(description.clone()),
            None => request,
        }
    }

    fn update_request(&self) -> UpdateTaskRequest {
        let request = UpdateTaskRequest::new(self.title.clone());
        match &self.description {
            Some(description) => request.with_description(description.clone()),
            None => request,
        }
    }
}

/// Builds a `302 Found` redirect.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

fn task_path(id: TaskId) -> String {
    format!("{TASKS_PATH}/{id}")
}

fn parse_id(raw: &str) -> Result<TaskId, WebError> {
    raw.parse().map_err(|_| WebError::NotFound)
}

/// Path of the referring task page, falling back to the list.
fn back_to_tasks(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .map(|uri| uri.path().to_owned())
        .filter(|path| path == TASKS_PATH || path.starts_with("/tasks/"))
        .unwrap_or_else(|| TASKS_PATH.to_owned())
}

/// `GET /`
pub async fn root() -> Response {
    found(TASKS_PATH)
}

/// Unmatched paths.
pub async fn not_found() -> WebError {
    WebError::NotFound
}

/// `GET /tasks`
pub async fn index<R, C>(
    State(state): State<AppState<R, C>>,
    flash: Flash,
    csrf: CsrfToken,
) -> Result<(Flash, Html<String>), WebError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let tasks = state.service.list().await?;
    let page = state
        .views
        .task_index(&tasks, flash.message(), csrf.as_str())?;
    Ok((flash, Html(page)))
}

/// `GET /tasks/create`
pub async fn create<R, C>(
    State(state): State<AppState<R, C>>,
    flash: Flash,
    csrf: CsrfToken,
) -> Result<(Flash, Html<String>), WebError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let page = state
        .views
        .task_create(&TaskForm::default(), flash.message(), csrf.as_str())?;
    Ok((flash, Html(page)))
}

/// `POST /tasks`
pub async fn store<R, C>(
    State(state): State<AppState<R, C>>,
    csrf: CsrfToken,
    form: Result<Form<TaskInput>, FormRejection>,
) -> Result<Response, WebError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Form(input) = form?;
    match state.service.create(input.create_request()).await {
        Ok(_) => Ok((SetFlash::new("Task created successfully."), found(TASKS_PATH)).into_response()),
        Err(TaskServiceError::Validation(err)) => {
            let form = TaskForm::rejected(&input.title, input.description.as_deref(), &err);
            let page = state.views.task_create(&form, None, csrf.as_str())?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// `GET /tasks/{id}`
pub async fn show<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
    flash: Flash,
    csrf: CsrfToken,
) -> Result<(Flash, Html<String>), WebError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task = state.service.get(parse_id(&raw_id)?).await?;
    let now = state.service.clock().utc();
    let page = state
        .views
        .task_show(&task, now, flash.message(), csrf.as_str())?;
    Ok((flash, Html(page)))
}

/// `GET /tasks/{id}/edit`
pub async fn edit<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
    flash: Flash,
    csrf: CsrfToken,
) -> Result<(Flash, Html<String>), WebError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task = state.service.get(parse_id(&raw_id)?).await?;
    let page = state.views.task_edit(
        task.id(),
        &TaskForm::from_task(&task),
        flash.message(),
        csrf.as_str(),
    )?;
    Ok((flash, Html(page)))
}

/// `PUT|PATCH /tasks/{id}`
pub async fn update<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
    csrf: CsrfToken,
    form: Result<Form<TaskInput>, FormRejection>,
) -> Result<Response, WebError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    let Form(input) = form?;
    match state.service.update(id, input.update_request()).await {
        Ok(task) => Ok((
            SetFlash::new("Task updated successfully."),
            found(&task_path(task.id())),
        )
            .into_response()),
        Err(TaskServiceError::Validation(err)) => {
            let form = TaskForm::rejected(&input.title, input.description.as_deref(), &err);
            let page = state.views.task_edit(id, &form, None, csrf.as_str())?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// `PUT /tasks/{id}/toggle-complete`
pub async fn toggle_complete<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, WebError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    state
        .service
        .toggle_completion(parse_id(&raw_id)?)
        .await?;
    Ok(found(&back_to_tasks(&headers)))
}

/// `DELETE /tasks/{id}`
pub async fn destroy<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.service.delete(parse_id(&raw_id)?).await?;
    Ok((SetFlash::new("Task deleted successfully."), found(TASKS_PATH)).into_response())
}
