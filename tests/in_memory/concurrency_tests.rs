//! Concurrent mutations of one task through the service.
//!
//! The repository wrapper yields to the scheduler before every call, so
//! interleavings that would lose a write under read-then-write are likely.

use super::helpers::TickingClock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rstest::{fixture, rstest};
use std::sync::Arc;
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskChange, TaskId},
    ports::{TaskRepository, TaskRepositoryResult},
    services::{CreateTaskRequest, TaskService, UpdateTaskRequest},
};

#[derive(Debug, Default)]
struct YieldingRepository {
    inner: InMemoryTaskRepository,
}

#[async_trait]
impl TaskRepository for YieldingRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        tokio::task::yield_now().await;
        self.inner.store(task).await
    }

    async fn update(
        &self,
        id: TaskId,
        change: TaskChange,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        tokio::task::yield_now().await;
        self.inner.update(id, change, at).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        tokio::task::yield_now().await;
        self.inner.find_by_id(id).await
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        tokio::task::yield_now().await;
        self.inner.list().await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        tokio::task::yield_now().await;
        self.inner.delete(id).await
    }
}

type YieldingService = TaskService<YieldingRepository, TickingClock>;

#[fixture]
fn service() -> YieldingService {
    TaskService::new(
        Arc::new(YieldingRepository::default()),
        Arc::new(TickingClock::default()),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_are_never_lost(service: YieldingService) {
    let id = service
        .create(CreateTaskRequest::new("Contended"))
        .await
        .expect("create succeeds")
        .id();

    for _ in 0..25 {
        let (first, second) =
            tokio::join!(service.toggle_completion(id), service.toggle_completion(id));
        first.expect("first toggle succeeds");
        second.expect("second toggle succeeds");

        let task = service.get(id).await.expect("task exists");
        assert!(!task.is_completed(), "two toggles must cancel out");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_edit_keeps_a_parallel_toggle(service: YieldingService) {
    let id = service
        .create(CreateTaskRequest::new("Original"))
        .await
        .expect("create succeeds")
        .id();

    let (edited, toggled) = tokio::join!(
        service.update(id, UpdateTaskRequest::new("Renamed")),
        service.toggle_completion(id)
    );
    edited.expect("edit succeeds");
    toggled.expect("toggle succeeds");

    let task = service.get(id).await.expect("task exists");
    assert_eq!(task.title().as_str(), "Renamed");
    assert!(task.is_completed());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_tasks_keep_increasing_update_times(service: YieldingService) {
    let id = service
        .create(CreateTaskRequest::new("Busy"))
        .await
        .expect("create succeeds")
        .id();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.toggle_completion(id).await })
        })
        .collect();
    let mut stamps = Vec::new();
    for handle in handles {
        let task = handle
            .await
            .expect("toggle task joins")
            .expect("toggle succeeds");
        stamps.push(task.updated_at());
    }

    stamps.sort();
    stamps.dedup();
    assert_eq!(stamps.len(), 8, "every toggle gets its own timestamp");
    let task = service.get(id).await.expect("task exists");
    assert!(!task.is_completed(), "an even number of toggles cancels out");
}
