//! `PostgreSQL` repository implementation for tasks and their history.

use super::{
    models::{TaskHistoryRow, TaskRecord, TaskRow},
    schema::{task_history, tasks},
};
use crate::db::{PgPool, run_blocking};
use crate::task::{
    domain::{
        PersistedHistoryData, PersistedTaskData, StagedTaskEdit, Task, TaskField,
        TaskHistoryEntry, TaskHistoryId, TaskId, TaskPriority, TaskStatus, order_for_display,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_connection<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking(
            move || {
                let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
                f(&mut connection)
            },
            TaskRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let record = to_record(task);
        self.with_connection(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&record)
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

    async fn commit_edit(&self, edit: &StagedTaskEdit) -> TaskRepositoryResult<()> {
        let task_id = edit.task().id();
        let record = to_record(edit.task());
        let history: Vec<TaskHistoryRow> = edit.history().iter().map(to_history_row).collect();
        self.with_connection(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let affected = diesel::update(tasks::table.find(record.id))
                    .set(&record)
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)?;
                if affected == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                if !history.is_empty() {
                    diesel::insert_into(task_history::table)
                        .values(&history)
                        .execute(tx)
                        .map_err(TaskRepositoryError::persistence)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.with_connection(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.with_connection(move |connection| {
            let rows = tasks::table
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_owned_by(&self, owner: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.with_connection(move |connection| {
            let rows = tasks::table
                .filter(tasks::user_id.eq(owner.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn search(
        &self,
        needle: &str,
        owner: Option<UserId>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let pattern = like_pattern(needle);
        self.with_connection(move |connection| {
            let mut query = tasks::table
                .select(TaskRow::as_select())
                .filter(
                    tasks::task_name
                        .ilike(pattern.clone())
                        .or(tasks::description.ilike(pattern)),
                )
                .order(tasks::created_at.asc())
                .into_boxed();
            if let Some(id) = owner {
                query = query.filter(tasks::user_id.eq(id.into_inner()));
            }
            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn history_for(&self, id: TaskId) -> TaskRepositoryResult<Vec<TaskHistoryEntry>> {
        self.with_connection(move |connection| {
            let rows = task_history::table
                .filter(task_history::task_id.eq(id.into_inner()))
                .select(TaskHistoryRow::as_select())
                .load::<TaskHistoryRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let mut entries = rows
                .into_iter()
                .map(row_to_history)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            order_for_display(&mut entries);
            Ok(entries)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.with_connection(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let history = task_history::table.filter(task_history::task_id.eq(id.into_inner()));
                diesel::delete(history)
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)?;
                let affected = diesel::delete(tasks::table.find(id.into_inner()))
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)?;
                if affected == 0 {
                    return Err(TaskRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn delete_owned_by(&self, owner: UserId) -> TaskRepositoryResult<usize> {
        self.with_connection(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let owned = tasks::table
                    .filter(tasks::user_id.eq(owner.into_inner()))
                    .select(tasks::id);
                diesel::delete(task_history::table.filter(task_history::task_id.eq_any(owned)))
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)?;
                diesel::delete(tasks::table.filter(tasks::user_id.eq(owner.into_inner())))
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)
            })
        })
        .await
    }
}

/// Builds an `ILIKE` pattern matching `needle` literally anywhere.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_record(task: &Task) -> TaskRecord {
    TaskRecord {
        id: task.id().into_inner(),
        task_name: task.task_name().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        user_id: task.user_id().into_inner(),
        start_date: task.start_date(),
        finish_date: task.finish_date(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        task_name,
        description,
        status: persisted_status,
        priority: persisted_priority,
        user_id,
        start_date,
        finish_date,
        created_at,
        updated_at,
    } = row;

    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        task_name,
        description,
        status,
        priority,
        user_id: UserId::from_uuid(user_id),
        start_date,
        finish_date,
        created_at,
        updated_at,
    }))
}

fn to_history_row(entry: &TaskHistoryEntry) -> TaskHistoryRow {
    TaskHistoryRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        changed_by: entry.changed_by().into_inner(),
        changed_at: entry.changed_at(),
        field_name: entry.field().as_str().to_owned(),
        old_value: entry.old_value().to_owned(),
        new_value: entry.new_value().to_owned(),
    }
}

fn row_to_history(row: TaskHistoryRow) -> TaskRepositoryResult<TaskHistoryEntry> {
    let field =
        TaskField::try_from(row.field_name.as_str()).map_err(TaskRepositoryError::persistence)?;
    Ok(TaskHistoryEntry::from_persisted(PersistedHistoryData {
        id: TaskHistoryId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        changed_by: UserId::from_uuid(row.changed_by),
        changed_at: row.changed_at,
        field,
        old_value: row.old_value,
        new_value: row.new_value,
    }))
}
