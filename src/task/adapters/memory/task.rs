//! In-memory repository for tasks and their history.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{StagedTaskEdit, Task, TaskHistoryEntry, TaskId, order_for_display},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;

/// Thread-safe in-memory task repository.
///
/// A single lock guards tasks and history, so an edit commit is atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    history: HashMap<TaskId, Vec<TaskHistoryEntry>>,
}

impl InMemoryTaskState {
    fn remove_task(&mut self, id: TaskId) -> bool {
        self.history.remove(&id);
        self.tasks.remove(&id).is_some()
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Collects matching tasks, oldest first.
fn collect_sorted<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<Task> {
    let mut collected: Vec<Task> = tasks.cloned().collect();
    collected.sort_by_key(Task::created_at);
    collected
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn commit_edit(&self, edit: &StagedTaskEdit) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let task = edit.task();
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        state
            .history
            .entry(task.id())
            .or_default()
            .extend(edit.history().iter().cloned());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(collect_sorted(state.tasks.values()))
    }

    async fn list_owned_by(&self, owner: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(collect_sorted(
            state.tasks.values().filter(|task| task.user_id() == owner),
        ))
    }

    async fn search(
        &self,
        needle: &str,
        owner: Option<UserId>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(collect_sorted(state.tasks.values().filter(|task| {
            owner.is_none_or(|id| task.user_id() == id) && task.matches_text(needle)
        })))
    }

    async fn history_for(&self, id: TaskId) -> TaskRepositoryResult<Vec<TaskHistoryEntry>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut entries = state.history.get(&id).cloned().unwrap_or_default();
        order_for_display(&mut entries);
        Ok(entries)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.remove_task(id) {
            Ok(())
        } else {
            Err(TaskRepositoryError::NotFound(id))
        }
    }

    async fn delete_owned_by(&self, owner: UserId) -> TaskRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let owned: Vec<TaskId> = state
            .tasks
            .values()
            .filter(|task| task.user_id() == owner)
            .map(Task::id)
            .collect();
        for id in &owned {
            state.remove_task(*id);
        }
        Ok(owned.len())
    }
}
