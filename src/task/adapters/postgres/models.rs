//! Diesel row models for task persistence.

use super::schema::{task_history, tasks};
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub task_name: String,
    /// Description.
    pub description: String,
    /// Status storage name.
    pub status: String,
    /// Priority storage name.
    pub priority: String,
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Planned start.
    pub start_date: Option<NaiveDateTime>,
    /// Planned finish.
    pub finish_date: Option<NaiveDateTime>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest edit timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for task records.
///
/// Null dates are written as null rather than skipped, so an update always
/// mirrors the staged task.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub task_name: String,
    /// Description.
    pub description: String,
    /// Status storage name.
    pub status: String,
    /// Priority storage name.
    pub priority: String,
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Planned start.
    pub start_date: Option<NaiveDateTime>,
    /// Planned finish.
    pub finish_date: Option<NaiveDateTime>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest edit timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for history entries, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskHistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Edited task.
    pub task_id: uuid::Uuid,
    /// Editing user.
    pub changed_by: uuid::Uuid,
    /// Edit timestamp.
    pub changed_at: DateTime<Utc>,
    /// Field name.
    pub field_name: String,
    /// Rendered value before the edit.
    pub old_value: String,
    /// Rendered value after the edit.
    pub new_value: String,
}
