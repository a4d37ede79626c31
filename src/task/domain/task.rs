//! Task aggregate root.

use super::{TaskDescription, TaskId, TaskTitle};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use mockable::Clock;

/// Fractional-second digits kept on timestamps (`timestamptz` precision).
const TIMESTAMP_PRECISION: u16 = 6;

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Mutation applied to an existing task.
///
/// Repositories apply a change against the stored record in one atomic step,
/// so concurrent changes to the same task are serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    /// Replace the title and description, leaving completion untouched.
    Revise {
        /// New title.
        title: TaskTitle,
        /// New description; `None` clears it.
        description: Option<TaskDescription>,
    },
    /// Flip the completion flag.
    ToggleCompletion,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<TaskDescription>,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, not yet completed task.
    #[must_use]
    pub fn new(
        title: TaskTitle,
        description: Option<TaskDescription>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = now(clock);
        Self {
            id: TaskId::new(),
            title,
            description,
            completed: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            completed: data.completed,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns whether the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle_completion(&mut self, clock: &impl Clock) -> bool {
        self.apply(TaskChange::ToggleCompletion, clock.utc());
        self.completed
    }

    /// Replaces the title and description.
    pub fn revise(
        &mut self,
        title: TaskTitle,
        description: Option<TaskDescription>,
        clock: &impl Clock,
    ) {
        self.apply(TaskChange::Revise { title, description }, clock.utc());
    }

    /// Applies `change` as of `at`.
    pub fn apply(&mut self, change: TaskChange, at: DateTime<Utc>) {
        match change {
            TaskChange::Revise { title, description } => {
                self.title = title;
                self.description = description;
            }
            TaskChange::ToggleCompletion => self.completed = !self.completed,
        }
        self.touch(at);
    }

    /// Advances `updated_at`, keeping it strictly increasing even when the
    /// clock has not moved since the previous mutation.
    fn touch(&mut self, at: DateTime<Utc>) {
        let current = at.trunc_subsecs(TIMESTAMP_PRECISION);
        self.updated_at = if current > self.updated_at {
            current
        } else {
            self.updated_at + TimeDelta::microseconds(1)
        };
    }
}

fn now(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(TIMESTAMP_PRECISION)
}
