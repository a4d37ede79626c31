//! Service layer for task creation, lookup, mutation, and removal.

use crate::task::{
    domain::{Task, TaskChange, TaskDescription, TaskDomainError, TaskId, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a task from submitted form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for revising an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: String,
    description: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates a request with the replacement title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskServiceError {
    /// Returns `true` when the error reports a missing task.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(TaskRepositoryError::NotFound(_)))
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the clock used to stamp mutations.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Validates and persists a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when the title is blank or
    /// too long, in which case nothing is persisted, or
    /// [`TaskServiceError::Repository`] when the repository rejects the
    /// write.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let description = TaskDescription::from_input(request.description);
        let task = Task::new(title, description, &*self.clock);
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Returns every task in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the lookup fails.
    pub async fn list(&self) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repository.list().await?)
    }

    /// Retrieves a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when no task has
    /// the identifier.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::Repository(TaskRepositoryError::NotFound(id)))
    }

    /// Replaces the title and description of an existing task.
    ///
    /// The task must exist before the input is validated, so a missing task
    /// is reported as not found even when the input is also invalid.
    ///
    /// # Errors
    ///
    /// Returns a not-found repository error, a validation error, or a
    /// repository failure.
    pub async fn update(&self, id: TaskId, request: UpdateTaskRequest) -> TaskServiceResult<Task> {
        self.get(id).await?;
        let title = TaskTitle::new(request.title)?;
        let description = TaskDescription::from_input(request.description);
        let task = self
            .repository
            .update(id, TaskChange::Revise { title, description }, self.clock.utc())
            .await?;
        info!(task_id = %id, "task updated");
        Ok(task)
    }

    /// Flips the completion flag of an existing task.
    ///
    /// # Errors
    ///
    /// Returns a not-found repository error or a repository failure.
    pub async fn toggle_completion(&self, id: TaskId) -> TaskServiceResult<Task> {
        let task = self
            .repository
            .update(id, TaskChange::ToggleCompletion, self.clock.utc())
            .await?;
        info!(task_id = %id, completed = task.is_completed(), "task completion toggled");
        Ok(task)
    }

    /// Deletes a task permanently.
    ///
    /// # Errors
    ///
    /// Returns a not-found repository error when the task is already gone,
    /// or a repository failure.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        self.repository.delete(id).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}
