//! Error types for task input parsing and edit staging.

use super::{TaskField, TaskId};
use crate::user::domain::UserId;
use thiserror::Error;

/// Submitted task input that cannot be turned into a proposal.
///
/// Any of these rejects the whole submission; no field is applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedInput {
    /// A field the form must always carry is absent.
    #[error("missing required field '{0}'")]
    MissingField(TaskField),

    /// A date field is not an ISO-8601 date-time.
    #[error("invalid date-time '{value}' for field '{field}'")]
    InvalidDate {
        /// Field that carried the value.
        field: TaskField,
        /// Raw submitted value.
        value: String,
    },

    /// The title is longer than [`super::Task::NAME_MAX_LEN`] characters.
    #[error("task name is longer than 100 characters: '{0}'")]
    TaskNameTooLong(String),

    /// The status is not one of the known statuses.
    #[error("unknown task status '{0}'")]
    InvalidStatus(String),

    /// The priority is not one of the known priorities.
    #[error("unknown task priority '{0}'")]
    InvalidPriority(String),

    /// The owner is not a user identifier.
    #[error("invalid user identifier '{0}'")]
    InvalidUserId(String),
}

/// Errors raised while staging an edit against a stored task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskEditError {
    /// The acting user may not edit the task.
    #[error("user {actor} may not edit task {task}")]
    Unauthorized {
        /// Acting user.
        actor: UserId,
        /// Target task.
        task: TaskId,
    },

    /// A current or proposed owner has no resolved username.
    #[error("unknown task owner: {0}")]
    UnknownOwner(UserId),
}

/// Error returned while parsing a stored history field name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task field: {0}")]
pub struct ParseTaskFieldError(pub String);
