//! Task aggregate root.

use super::{TaskId, TaskPriority, TaskStatus};
use crate::user::domain::UserId;
use chrono::{DateTime, NaiveDateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    task_name: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    user_id: UserId,
    start_date: Option<NaiveDateTime>,
    finish_date: Option<NaiveDateTime>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field values for a task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    task_name: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    user_id: UserId,
    start_date: Option<NaiveDateTime>,
    finish_date: Option<NaiveDateTime>,
}

impl NewTask {
    /// Starts a waiting, medium-priority task owned by `user_id`.
    #[must_use]
    pub fn new(task_name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            task_name: task_name.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            user_id,
            start_date: None,
            finish_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the planned start.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: Option<NaiveDateTime>) -> Self {
        self.start_date = start_date;
        self
    }

    /// Sets the planned finish.
    #[must_use]
    pub const fn with_finish_date(mut self, finish_date: Option<NaiveDateTime>) -> Self {
        self.finish_date = finish_date;
        self
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub task_name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted owner.
    pub user_id: UserId,
    /// Persisted planned start.
    pub start_date: Option<NaiveDateTime>,
    /// Persisted planned finish.
    pub finish_date: Option<NaiveDateTime>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest edit timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Longest accepted title, in characters. Matches the `task_name` column.
    pub const NAME_MAX_LEN: usize = 100;

    /// Creates a task from new task values.
    #[must_use]
    pub fn new(new_task: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            task_name: new_task.task_name,
            description: new_task.description,
            status: new_task.status,
            priority: new_task.priority,
            user_id: new_task.user_id,
            start_date: new_task.start_date,
            finish_date: new_task.finish_date,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            task_name: data.task_name,
            description: data.description,
            status: data.status,
            priority: data.priority,
            user_id: data.user_id,
            start_date: data.start_date,
            finish_date: data.finish_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the planned start, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDateTime> {
        self.start_date
    }

    /// Returns the planned finish, if any.
    #[must_use]
    pub const fn finish_date(&self) -> Option<NaiveDateTime> {
        self.finish_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp of the latest edit that changed something.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the title or description contains `needle`, ignoring
    /// case.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        let lowered = needle.to_lowercase();
        self.task_name.to_lowercase().contains(&lowered)
            || self.description.to_lowercase().contains(&lowered)
    }

    pub(super) fn set_task_name(&mut self, task_name: String) {
        self.task_name = task_name;
    }

    pub(super) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub(super) const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub(super) const fn set_priority(&mut self, priority: TaskPriority) {
        self.priority = priority;
    }

    pub(super) const fn set_start_date(&mut self, start_date: NaiveDateTime) {
        self.start_date = Some(start_date);
    }

    pub(super) const fn set_finish_date(&mut self, finish_date: NaiveDateTime) {
        self.finish_date = Some(finish_date);
    }

    pub(super) const fn set_user_id(&mut self, user_id: UserId) {
        self.user_id = user_id;
    }

    pub(super) const fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
