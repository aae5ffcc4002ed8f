//! Shared world state for task editing BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use tasktrack::{
    access::{AccessPolicy, CapabilityTable},
    task::{
        adapters::memory::InMemoryTaskRepository,
        domain::{StagedTaskEdit, Task},
        services::{TaskService, TaskServiceError},
    },
    user::{adapters::memory::InMemoryUserRepository, domain::User},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService =
    TaskService<InMemoryTaskRepository, InMemoryUserRepository, DefaultClock>;

/// Scenario world for task editing behaviour tests.
pub struct TaskEditingWorld {
    pub service: TestTaskService,
    pub users: Arc<InMemoryUserRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub named_users: HashMap<String, User>,
    pub task: Option<Task>,
    pub last_edit_result: Option<Result<StagedTaskEdit, TaskServiceError>>,
}

impl TaskEditingWorld {
    /// Creates a world with empty repositories and the legacy capability
    /// table.
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let service = TaskService::new(
            Arc::clone(&tasks),
            Arc::clone(&users),
            Arc::new(DefaultClock),
            AccessPolicy::new(CapabilityTable::legacy()),
        );

        Self {
            service,
            users,
            tasks,
            named_users: HashMap::new(),
            task: None,
            last_edit_result: None,
        }
    }

    /// Looks up a user created by an earlier step.
    ///
    /// # Errors
    ///
    /// Returns an error if no step created a user with that name.
    pub fn user(&self, name: &str) -> Result<&User, eyre::Report> {
        self.named_users
            .get(name)
            .ok_or_else(|| eyre::eyre!("no user named {name} in scenario world"))
    }

    /// Returns the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error if no step created the task.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for TaskEditingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskEditingWorld {
    TaskEditingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
