//! Service layer for task creation, listing, editing and deletion.

use crate::access::AccessPolicy;
use crate::task::{
    domain::{
        EditContext, MalformedInput, NewTask, OwnerNames, StagedTaskEdit, Task, TaskEditError,
        TaskEditForm, TaskEditProposal, TaskField, TaskHistoryEntry, TaskId, TaskPriority,
        TaskStatus, apply_edit, check_task_name, parse_datetime,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::{
    domain::{User, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use chrono::NaiveDateTime;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
///
/// Values arrive as submitted text and are validated by
/// [`TaskService::create_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    task_name: String,
    description: String,
    status: Option<String>,
    priority: Option<String>,
    start_date: Option<String>,
    finish_date: Option<String>,
    user_id: Option<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            description: String::new(),
            status: None,
            priority: None,
            start_date: None,
            finish_date: None,
            user_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status name.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the priority name.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the planned start as ISO-8601 text.
    #[must_use]
    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    /// Sets the planned finish as ISO-8601 text.
    #[must_use]
    pub fn with_finish_date(mut self, finish_date: impl Into<String>) -> Self {
        self.finish_date = Some(finish_date.into());
        self
    }

    /// Requests a specific owner. Honoured only for actors who may edit every
    /// task.
    #[must_use]
    pub const fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// A task together with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetail {
    /// The task.
    pub task: Task,
    /// History entries, most recent edit first.
    pub history: Vec<TaskHistoryEntry>,
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The acting user may not perform the operation on the task.
    #[error("user {actor} is not allowed to access task {task}")]
    Unauthorized {
        /// Acting user.
        actor: UserId,
        /// Target task.
        task: TaskId,
    },

    /// Submitted values could not be parsed.
    #[error(transparent)]
    MalformedInput(#[from] MalformedInput),

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

impl From<TaskEditError> for TaskServiceError {
    fn from(err: TaskEditError) -> Self {
        match err {
            TaskEditError::Unauthorized { actor, task } => Self::Unauthorized { actor, task },
            TaskEditError::UnknownOwner(id) => Self::UserNotFound(id),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task request orchestration service.
///
/// Every operation takes the acting user's id and reloads that user, so role
/// changes apply to the next request.
#[derive(Clone)]
pub struct TaskService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    clock: Arc<C>,
    policy: AccessPolicy,
}

impl<T, U, C> TaskService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, users: Arc<U>, clock: Arc<C>, policy: AccessPolicy) -> Self {
        Self {
            tasks,
            users,
            clock,
            policy,
        }
    }

    /// Returns the access policy in force.
    #[must_use]
    pub const fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    async fn load_user(&self, id: UserId) -> TaskServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::UserNotFound(id))
    }

    async fn load_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Creates a task.
    ///
    /// Status defaults to waiting and priority to medium; blank dates mean
    /// none. The actor owns the task unless they may edit every task and
    /// requested another owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::MalformedInput`] for an over-long title or
    /// unparseable values, [`TaskServiceError::UserNotFound`] for an unknown
    /// actor or requested owner, and repository errors from persistence.
    pub async fn create_task(
        &self,
        actor_id: UserId,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let actor = self.load_user(actor_id).await?;

        check_task_name(&request.task_name)?;
        let status = parse_or_default(request.status.as_deref(), |raw| {
            TaskStatus::try_from(raw).map_err(|err| MalformedInput::InvalidStatus(err.0))
        })?;
        let priority = parse_or_default(request.priority.as_deref(), |raw| {
            TaskPriority::try_from(raw).map_err(|err| MalformedInput::InvalidPriority(err.0))
        })?;
        let start_date = optional_date(TaskField::StartDate, request.start_date.as_deref())?;
        let finish_date = optional_date(TaskField::FinishDate, request.finish_date.as_deref())?;

        let owner = match request.user_id {
            Some(requested) if self.policy.can_edit_all(&actor) => {
                self.load_user(requested).await?.id()
            }
            Some(requested) => {
                debug!(
                    actor = %actor.id(),
                    %requested,
                    "ignoring owner requested without edit-all capability"
                );
                actor.id()
            }
            None => actor.id(),
        };

        let task = Task::new(
            NewTask::new(request.task_name, owner)
                .with_description(request.description)
                .with_status(status)
                .with_priority(priority)
                .with_start_date(start_date)
                .with_finish_date(finish_date),
            &*self.clock,
        );
        self.tasks.store(&task).await?;
        info!(task = %task.id(), actor = %actor.id(), owner = %owner, "task created");
        Ok(task)
    }

    /// Lists the tasks the actor may see.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UserNotFound`] for an unknown actor and
    /// repository errors from persistence.
    pub async fn list_tasks(&self, actor_id: UserId) -> TaskServiceResult<Vec<Task>> {
        let actor = self.load_user(actor_id).await?;
        let tasks = if self.policy.can_view_all(&actor) {
            self.tasks.list().await?
        } else {
            self.tasks.list_owned_by(actor.id()).await?
        };
        Ok(self.policy.visible_tasks(&actor, tasks))
    }

    /// Finds visible tasks whose title or description contains `query`,
    /// ignoring case. A blank query finds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UserNotFound`] for an unknown actor and
    /// repository errors from persistence.
    pub async fn search_tasks(
        &self,
        actor_id: UserId,
        query: &str,
    ) -> TaskServiceResult<Vec<Task>> {
        let actor = self.load_user(actor_id).await?;
        let needle = query.trim();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let owner = (!self.policy.can_view_all(&actor)).then_some(actor.id());
        let found = self.tasks.search(needle, owner).await?;
        Ok(self.policy.visible_tasks(&actor, found))
    }

    /// Returns a task with its history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] for an unknown task,
    /// [`TaskServiceError::Unauthorized`] when the task is outside the
    /// actor's visibility scope, and repository errors from persistence.
    pub async fn task_detail(
        &self,
        actor_id: UserId,
        task_id: TaskId,
    ) -> TaskServiceResult<TaskDetail> {
        let actor = self.load_user(actor_id).await?;
        let task = self.load_task(task_id).await?;
        if !self.policy.may_view(&actor, &task) {
            warn!(actor = %actor.id(), task = %task_id, "task detail refused");
            return Err(TaskServiceError::Unauthorized {
                actor: actor.id(),
                task: task_id,
            });
        }
        let history = self.tasks.history_for(task_id).await?;
        Ok(TaskDetail { task, history })
    }

    /// Applies a submitted edit form to a task and records its history.
    ///
    /// The task update and its history rows are committed together. An edit
    /// that changes nothing commits nothing.
    ///
    /// # Errors
    ///
    /// Returns, in this order of checking: [`TaskServiceError::UserNotFound`]
    /// for an unknown actor, [`TaskServiceError::TaskNotFound`],
    /// [`TaskServiceError::Unauthorized`] when the actor may not edit the
    /// task, [`TaskServiceError::MalformedInput`] for unparseable values, and
    /// [`TaskServiceError::UserNotFound`] for an unknown proposed owner. On
    /// any error neither the task nor its history changes.
    pub async fn edit_task(
        &self,
        actor_id: UserId,
        task_id: TaskId,
        form: &TaskEditForm,
    ) -> TaskServiceResult<StagedTaskEdit> {
        let actor = self.load_user(actor_id).await?;
        let current = self.load_task(task_id).await?;
        if !self.policy.may_edit(&actor, &current) {
            warn!(actor = %actor.id(), task = %task_id, "task edit refused");
            return Err(TaskServiceError::Unauthorized {
                actor: actor.id(),
                task: task_id,
            });
        }

        let proposal = TaskEditProposal::parse(form)?;
        let owners = self.resolve_owners(&actor, &current, &proposal).await?;
        let context = EditContext::new(&actor, &self.policy, &*self.clock);
        let staged = apply_edit(&current, &proposal, &context, &owners)?;

        if staged.is_unchanged() {
            debug!(task = %task_id, "task edit changed nothing");
            return Ok(staged);
        }
        self.tasks.commit_edit(&staged).await?;
        info!(
            task = %task_id,
            actor = %actor.id(),
            changes = staged.history().len(),
            "task edited"
        );
        Ok(staged)
    }

    /// Usernames for the current and proposed owners when a reassignment
    /// will be honoured.
    async fn resolve_owners(
        &self,
        actor: &User,
        current: &Task,
        proposal: &TaskEditProposal,
    ) -> TaskServiceResult<OwnerNames> {
        let mut owners = OwnerNames::new();
        let Some(requested) = proposal.user_id() else {
            return Ok(owners);
        };
        if !self.policy.can_edit_all(actor) {
            debug!(
                actor = %actor.id(),
                %requested,
                "ignoring reassignment without edit-all capability"
            );
            return Ok(owners);
        }
        if requested == current.user_id() {
            return Ok(owners);
        }
        owners.insert(&self.load_user(current.user_id()).await?);
        owners.insert(&self.load_user(requested).await?);
        Ok(owners)
    }

    /// Deletes a task and its history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] for an unknown task,
    /// [`TaskServiceError::Unauthorized`] when the actor may not edit it, and
    /// repository errors from persistence.
    pub async fn delete_task(&self, actor_id: UserId, task_id: TaskId) -> TaskServiceResult<()> {
        let actor = self.load_user(actor_id).await?;
        let task = self.load_task(task_id).await?;
        if !self.policy.may_edit(&actor, &task) {
            warn!(actor = %actor.id(), task = %task_id, "task deletion refused");
            return Err(TaskServiceError::Unauthorized {
                actor: actor.id(),
                task: task_id,
            });
        }
        self.tasks.delete(task_id).await?;
        info!(task = %task_id, actor = %actor.id(), "task deleted");
        Ok(())
    }

    /// Users the actor may assign a task to: everyone for actors who may
    /// edit every task, otherwise only the actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UserNotFound`] for an unknown actor and
    /// repository errors from persistence.
    pub async fn assignable_users(&self, actor_id: UserId) -> TaskServiceResult<Vec<User>> {
        let actor = self.load_user(actor_id).await?;
        if self.policy.can_edit_all(&actor) {
            return Ok(self.users.list().await?);
        }
        Ok(vec![actor])
    }
}

fn parse_or_default<V, F>(raw: Option<&str>, parse: F) -> Result<V, MalformedInput>
where
    V: Default,
    F: FnOnce(&str) -> Result<V, MalformedInput>,
{
    match raw {
        Some(value) if !value.trim().is_empty() => parse(value),
        _ => Ok(V::default()),
    }
}

fn optional_date(
    field: TaskField,
    raw: Option<&str>,
) -> Result<Option<NaiveDateTime>, MalformedInput> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| parse_datetime(field, value))
        .transpose()
}
