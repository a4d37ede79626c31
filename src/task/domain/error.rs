//! Error types for task domain validation.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("The title field is required.")]
    EmptyTitle,

    /// The task title exceeds the persisted column width.
    #[error("The title may not be greater than {max} characters (got {actual}).")]
    TitleTooLong {
        /// Largest accepted length in characters.
        max: usize,
        /// Length of the rejected title in characters.
        actual: usize,
    },
}
