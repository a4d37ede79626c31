//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{PersistedTaskData, Task, TaskChange, TaskDescription, TaskId, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema creation SQL, safe to run against an already migrated database.
const CREATE_TASKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-14-000000_create_tasks/up.sql");

/// Builds a connection pool for the given database URL.
///
/// Blocks while the pool establishes its initial connections.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Persistence`] when the pool cannot be
/// built.
pub fn connect(database_url: &str, max_size: u32) -> TaskRepositoryResult<TaskPgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(TaskRepositoryError::persistence)
}

/// Creates the `tasks` table and its index when they are missing.
///
/// This is a blocking operation that should be called from `spawn_blocking`
/// or a synchronous context.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Persistence`] when no connection is
/// available or the schema SQL fails.
pub fn apply_migrations(pool: &TaskPgPool) -> TaskRepositoryResult<()> {
    let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
    connection
        .batch_execute(CREATE_TASKS_SQL)
        .map_err(TaskRepositoryError::persistence)
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

/// Failure inside a transaction body; Diesel needs `From<DieselError>` to
/// roll back.
#[derive(Debug, Error)]
enum TransactionError {
    #[error(transparent)]
    Diesel(#[from] DieselError),
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl From<TransactionError> for TaskRepositoryError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Diesel(err) => Self::persistence(err),
            TransactionError::Repository(err) => err,
        }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        id: TaskId,
        change: TaskChange,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TransactionError, _>(|tx| {
                    let row = tasks::table
                        .filter(tasks::id.eq(id.into_inner()))
                        .select(TaskRow::as_select())
                        .for_update()
                        .first::<TaskRow>(tx)
                        .optional()?
                        .ok_or(TaskRepositoryError::NotFound(id))?;
                    let mut task = row_to_task(row)?;
                    task.apply(change, at);
                    diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                        .set(&to_changeset(&task))
                        .execute(tx)?;
                    Ok(task)
                })
                .map_err(TaskRepositoryError::from)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .order((tasks::created_at.asc(), tasks::seq.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(|text| text.as_str().to_owned()),
        completed: task.is_completed(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(|text| text.as_str().to_owned()),
        completed: task.is_completed(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        description,
        completed,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description: TaskDescription::from_input(description),
        completed,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
