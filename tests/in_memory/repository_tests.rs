//! Store contract tests for the in-memory adapter.

use super::helpers::{TickingClock, repo};
use mockable::Clock;
use rstest::rstest;
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{PersistedTaskData, Task, TaskChange, TaskDescription, TaskId, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};

fn task(title: &str, clock: &TickingClock) -> Task {
    Task::new(
        TaskTitle::new(title).expect("valid title"),
        TaskDescription::from_input(None),
        clock,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn storing_the_same_task_twice_is_a_duplicate(repo: InMemoryTaskRepository) {
    let clock = TickingClock::default();
    let task = task("Only once", &clock);
    repo.store(&task).await.expect("first store succeeds");

    let result = repo.store(&task).await;

    assert!(matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()));
    assert_eq!(repo.list().await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_and_delete_of_unknown_task_report_not_found(repo: InMemoryTaskRepository) {
    let clock = TickingClock::default();
    let ghost = task("Ghost", &clock);

    assert!(matches!(
        repo.update(ghost.id(), TaskChange::ToggleCompletion, clock.utc())
            .await,
        Err(TaskRepositoryError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete(TaskId::new()).await,
        Err(TaskRepositoryError::NotFound(_))
    ));
    assert_eq!(repo.find_by_id(ghost.id()).await.expect("lookup"), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clones_share_the_same_store(repo: InMemoryTaskRepository) {
    let clock = TickingClock::default();
    let handle = repo.clone();
    let task = task("Shared", &clock);

    repo.store(&task).await.expect("store succeeds");

    assert_eq!(handle.find_by_id(task.id()).await.expect("lookup"), Some(task));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_orders_by_creation_time_not_insertion(repo: InMemoryTaskRepository) {
    let clock = TickingClock::default();
    let earlier = task("Earlier", &clock);
    let later = task("Later", &clock);

    repo.store(&later).await.expect("store later");
    repo.store(&earlier).await.expect("store earlier");

    let titles: Vec<String> = repo
        .list()
        .await
        .expect("list")
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect();
    assert_eq!(titles, ["Earlier", "Later"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_returns_and_stores_the_changed_record(repo: InMemoryTaskRepository) {
    let clock = TickingClock::default();
    let task = task("Before", &clock);
    repo.store(&task).await.expect("store succeeds");

    let updated = repo
        .update(
            task.id(),
            TaskChange::Revise {
                title: TaskTitle::new("After").expect("valid title"),
                description: TaskDescription::from_input(Some("notes".to_owned())),
            },
            clock.utc(),
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.title().as_str(), "After");
    assert!(updated.updated_at() > task.updated_at());
    assert_eq!(
        repo.find_by_id(task.id()).await.expect("lookup"),
        Some(updated)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_created_in_the_same_instant_list_in_insertion_order(
    repo: InMemoryTaskRepository,
) {
    let instant = TickingClock::start();
    let titles: Vec<String> = (0..20).map(|n| format!("Task {n}")).collect();
    for title in &titles {
        let task = Task::from_persisted(PersistedTaskData {
            id: TaskId::new(),
            title: TaskTitle::new(title.as_str()).expect("valid title"),
            description: None,
            completed: false,
            created_at: instant,
            updated_at: instant,
        });
        repo.store(&task).await.expect("store succeeds");
    }

    let listed: Vec<String> = repo
        .list()
        .await
        .expect("list")
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect();
    assert_eq!(listed, titles);
}
