//! Server-rendered pages.
//!
//! Templates are compiled into the binary and rendered with `minijinja`,
//! which escapes every interpolated value because the template names end in
//! `.html`. Each page is a pure function of the data handed to it.

mod humanize;

pub use humanize::relative_to;

use crate::task::domain::{Task, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use minijinja::{Environment, context};
use serde::Serialize;

const TEMPLATES: [(&str, &str); 7] = [
    ("layout.html", include_str!("../../../templates/layout.html")),
    ("tasks/_fields.html", include_str!("../../../templates/tasks/_fields.html")),
    ("tasks/index.html", include_str!("../../../templates/tasks/index.html")),
    ("tasks/create.html", include_str!("../../../templates/tasks/create.html")),
    ("tasks/edit.html", include_str!("../../../templates/tasks/edit.html")),
    ("tasks/show.html", include_str!("../../../templates/tasks/show.html")),
    ("error.html", include_str!("../../../templates/error.html")),
];

/// Status label shown for a task.
#[must_use]
pub const fn status_label(completed: bool) -> &'static str {
    if completed { "Completed" } else { "Pending" }
}

/// Row of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    id: String,
    title: String,
    completed: bool,
    status: &'static str,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            title: task.title().as_str().to_owned(),
            completed: task.is_completed(),
            status: status_label(task.is_completed()),
        }
    }
}

/// Full field set of a single task, with relative timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetail {
    id: String,
    title: String,
    description: Option<String>,
    completed: bool,
    status: &'static str,
    created_at: String,
    updated_at: String,
    created_ago: String,
    updated_ago: String,
}

impl TaskDetail {
    /// Builds the detail view of `task` as seen at `now`.
    #[must_use]
    pub fn new(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id().to_string(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(|text| text.as_str().to_owned()),
            completed: task.is_completed(),
            status: status_label(task.is_completed()),
            created_at: task.created_at().to_rfc3339(),
            updated_at: task.updated_at().to_rfc3339(),
            created_ago: relative_to(task.created_at(), now),
            updated_ago: relative_to(task.updated_at(), now),
        }
    }
}

/// Create/edit form contents with field-level messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskForm {
    title: String,
    description: String,
    errors: FormErrors,
}

/// Field-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    title: Option<String>,
}

impl TaskForm {
    /// Form pre-filled from an existing task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().as_str().to_owned(),
            description: task
                .description()
                .map(|text| text.as_str().to_owned())
                .unwrap_or_default(),
            errors: FormErrors::default(),
        }
    }

    /// Form echoing rejected input alongside the validation message.
    #[must_use]
    pub fn rejected(title: &str, description: Option<&str>, error: &TaskDomainError) -> Self {
        Self {
            title: title.to_owned(),
            description: description.unwrap_or_default().to_owned(),
            errors: FormErrors {
                title: Some(error.to_string()),
            },
        }
    }
}

/// Compiled page templates.
#[derive(Debug)]
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Compiles every page template.
    ///
    /// # Errors
    ///
    /// Returns a [`minijinja::Error`] when a template fails to parse.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Renders the task list.
    ///
    /// # Errors
    ///
    /// Returns a [`minijinja::Error`] when rendering fails.
    pub fn task_index(
        &self,
        tasks: &[Task],
        flash: Option<&str>,
        csrf_token: &str,
    ) -> Result<String, minijinja::Error> {
        let tasks: Vec<TaskSummary> = tasks.iter().map(TaskSummary::from).collect();
        self.env.get_template("tasks/index.html")?.render(context! {
            tasks,
            flash,
            csrf_token,
        })
    }

    /// Renders the create form.
    ///
    /// # Errors
    ///
    /// Returns a [`minijinja::Error`] when rendering fails.
    pub fn task_create(
        &self,
        form: &TaskForm,
        flash: Option<&str>,
        csrf_token: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("tasks/create.html")?.render(context! {
            form,
            flash,
            csrf_token,
        })
    }

    /// Renders the edit form for the task `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`minijinja::Error`] when rendering fails.
    pub fn task_edit(
        &self,
        id: TaskId,
        form: &TaskForm,
        flash: Option<&str>,
        csrf_token: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("tasks/edit.html")?.render(context! {
            id => id.to_string(),
            form,
            flash,
            csrf_token,
        })
    }

    /// Renders the detail page of `task` as seen at `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`minijinja::Error`] when rendering fails.
    pub fn task_show(
        &self,
        task: &Task,
        now: DateTime<Utc>,
        flash: Option<&str>,
        csrf_token: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("tasks/show.html")?.render(context! {
            task => TaskDetail::new(task, now),
            flash,
            csrf_token,
        })
    }

    /// Renders an error page.
    ///
    /// # Errors
    ///
    /// Returns a [`minijinja::Error`] when rendering fails.
    pub fn error_page(
        &self,
        status: u16,
        reason: &str,
        message: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("error.html")?.render(context! {
            status,
            reason,
            message,
        })
    }
}
