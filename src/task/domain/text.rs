//! Validated text values carried by a task.

use super::TaskDomainError;
use serde::Deserialize;
use std::fmt;

/// Non-empty, trimmed task title.
///
/// Deserialization runs the same checks as [`TaskTitle::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Largest title length, matching the `varchar(255)` column.
    pub const MAX_CHARS: usize = 255;

    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the value is blank and
    /// [`TaskDomainError::TitleTooLong`] when it exceeds
    /// [`TaskTitle::MAX_CHARS`].
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let actual = trimmed.chars().count();
        if actual > Self::MAX_CHARS {
            return Err(TaskDomainError::TitleTooLong {
                max: Self::MAX_CHARS,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskTitle {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form task description.
///
/// Blank input carries no information and is represented as the absence of
/// a description rather than an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Normalises optional user input into a description.
    ///
    /// Returns `None` when the input is absent or only whitespace.
    #[must_use]
    pub fn from_input(value: Option<String>) -> Option<Self> {
        value
            .map(|raw| raw.trim().to_owned())
            .filter(|trimmed| !trimmed.is_empty())
            .map(Self)
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
