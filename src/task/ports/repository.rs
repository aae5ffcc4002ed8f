//! Repository port for tasks and their audit trail.

use crate::task::domain::{StagedTaskEdit, Task, TaskHistoryEntry, TaskId};
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists an edited task together with its history rows.
    ///
    /// Either the task update and every history row are written, or nothing
    /// is.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task no longer
    /// exists.
    async fn commit_edit(&self, edit: &StagedTaskEdit) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task, oldest first.
    async fn list(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the tasks owned by `owner`, oldest first.
    async fn list_owned_by(&self, owner: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks whose title or description contains `needle`, ignoring
    /// case, optionally narrowed to one owner.
    async fn search(
        &self,
        needle: &str,
        owner: Option<UserId>,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the history of a task, most recent edit first.
    async fn history_for(&self, id: TaskId) -> TaskRepositoryResult<Vec<TaskHistoryEntry>>;

    /// Deletes a task and its history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Deletes every task owned by `owner` with its history, returning how
    /// many tasks were removed.
    async fn delete_owned_by(&self, owner: UserId) -> TaskRepositoryResult<usize>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        // Needed by diesel transactions; semantic errors are raised
        // explicitly inside the transaction body.
        Self::persistence(err)
    }
}
