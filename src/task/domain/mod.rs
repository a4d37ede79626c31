//! Domain model for task tracking.
//!
//! A task is a titled to-do item with an optional description and a
//! two-state completion flag. All infrastructure concerns live outside of
//! the domain boundary.

mod error;
mod ids;
mod task;
mod text;

pub use error::TaskDomainError;
pub use ids::TaskId;
pub use task::{PersistedTaskData, Task, TaskChange};
pub use text::{TaskDescription, TaskTitle};
