//! Field-level audit records.

use super::{TaskField, TaskHistoryId, TaskId};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Immutable record of one field changing in one edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    id: TaskHistoryId,
    task_id: TaskId,
    changed_by: UserId,
    changed_at: DateTime<Utc>,
    field: TaskField,
    old_value: String,
    new_value: String,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted entry identifier.
    pub id: TaskHistoryId,
    /// Task the entry belongs to.
    pub task_id: TaskId,
    /// User who made the edit.
    pub changed_by: UserId,
    /// Time of the edit.
    pub changed_at: DateTime<Utc>,
    /// Field that changed.
    pub field: TaskField,
    /// Rendered value before the edit.
    pub old_value: String,
    /// Rendered value after the edit.
    pub new_value: String,
}

impl TaskHistoryEntry {
    pub(super) fn record(
        task_id: TaskId,
        changed_by: UserId,
        changed_at: DateTime<Utc>,
        field: TaskField,
        old_value: String,
        new_value: String,
    ) -> Self {
        Self {
            id: TaskHistoryId::new(),
            task_id,
            changed_by,
            changed_at,
            field,
            old_value,
            new_value,
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            changed_by: data.changed_by,
            changed_at: data.changed_at,
            field: data.field,
            old_value: data.old_value,
            new_value: data.new_value,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> TaskHistoryId {
        self.id
    }

    /// Returns the task the entry belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the user who made the edit.
    #[must_use]
    pub const fn changed_by(&self) -> UserId {
        self.changed_by
    }

    /// Returns the time of the edit.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Returns the field that changed.
    #[must_use]
    pub const fn field(&self) -> TaskField {
        self.field
    }

    /// Returns the rendered value before the edit.
    #[must_use]
    pub fn old_value(&self) -> &str {
        &self.old_value
    }

    /// Returns the rendered value after the edit.
    #[must_use]
    pub fn new_value(&self) -> &str {
        &self.new_value
    }
}

/// Sorts entries newest edit first, keeping field check order within an edit.
pub fn order_for_display(entries: &mut [TaskHistoryEntry]) {
    entries.sort_by_key(|entry| (Reverse(entry.changed_at), entry.field));
}
