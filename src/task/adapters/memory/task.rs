//! In-memory task repository used by default and in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskChange, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: HashMap<TaskId, StoredTask>,
    next_seq: u64,
}

/// A task plus its insertion sequence number, which breaks `created_at` ties.
#[derive(Debug)]
struct StoredTask {
    seq: u64,
    task: Task,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.tasks.insert(
            task.id(),
            StoredTask {
                seq,
                task: task.clone(),
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        id: TaskId,
        change: TaskChange,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        stored.task.apply(change, at);
        Ok(stored.task.clone())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).map(|stored| stored.task.clone()))
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut all: Vec<&StoredTask> = state.tasks.values().collect();
        all.sort_by_key(|stored| (stored.task.created_at(), stored.seq));
        Ok(all.into_iter().map(|stored| stored.task.clone()).collect())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }
}
