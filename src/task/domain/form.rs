//! Raw edit forms and their typed proposals.

use super::{BlankInput, FieldPolicy, MalformedInput, Task, TaskField, TaskPriority, TaskStatus};
use crate::user::domain::UserId;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 date-time as submitted by a form.
///
/// Accepts `YYYY-MM-DDTHH:MM`, optionally followed by seconds and a
/// fraction, with a space allowed in place of the `T`. A bare `YYYY-MM-DD`
/// means midnight. Offsets are not accepted: stored dates are naive.
///
/// # Errors
///
/// Returns [`MalformedInput::InvalidDate`] naming `field` when no format
/// matches.
pub fn parse_datetime(field: TaskField, raw: &str) -> Result<NaiveDateTime, MalformedInput> {
    let value = raw.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| MalformedInput::InvalidDate {
            field,
            value: raw.to_owned(),
        })
}

/// Checks a submitted title against [`Task::NAME_MAX_LEN`].
///
/// # Errors
///
/// Returns [`MalformedInput::TaskNameTooLong`] carrying the raw title.
pub fn check_task_name(raw: &str) -> Result<&str, MalformedInput> {
    if raw.chars().count() > Task::NAME_MAX_LEN {
        return Err(MalformedInput::TaskNameTooLong(raw.to_owned()));
    }
    Ok(raw)
}

/// Renders a date-time the way history rows record it, for example
/// `2024-03-01 09:30:00`. Sub-second precision is kept only when present.
#[must_use]
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

/// String-keyed field values exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEditForm {
    fields: BTreeMap<String, String>,
}

impl TaskEditForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a submitted value.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the submitted value for `field`, if the key is present.
    #[must_use]
    pub fn get(&self, field: TaskField) -> Option<&str> {
        self.fields.get(field.as_str()).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for TaskEditForm
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Typed field values proposed for an existing task.
///
/// `None` means the field is not part of the update and keeps its stored
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEditProposal {
    task_name: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    start_date: Option<NaiveDateTime>,
    finish_date: Option<NaiveDateTime>,
    user_id: Option<UserId>,
}

impl TaskEditProposal {
    /// Parses a submitted form under [`super::EDIT_POLICY`].
    ///
    /// # Errors
    ///
    /// Returns the first [`MalformedInput`] found in field check order. No
    /// partial proposal is returned.
    pub fn parse(form: &TaskEditForm) -> Result<Self, MalformedInput> {
        let mut proposal = Self::default();
        for field in TaskField::ALL {
            let Some(raw) = submitted_value(form, field.policy())? else {
                continue;
            };
            match field {
                TaskField::TaskName => {
                    proposal.task_name = Some(check_task_name(raw)?.to_owned());
                }
                TaskField::Description => proposal.description = Some(raw.to_owned()),
                TaskField::Status => {
                    let status = TaskStatus::try_from(raw)
                        .map_err(|err| MalformedInput::InvalidStatus(err.0))?;
                    proposal.status = Some(status);
                }
                TaskField::Priority => {
                    let priority = TaskPriority::try_from(raw)
                        .map_err(|err| MalformedInput::InvalidPriority(err.0))?;
                    proposal.priority = Some(priority);
                }
                TaskField::StartDate => {
                    proposal.start_date = Some(parse_datetime(TaskField::StartDate, raw)?);
                }
                TaskField::FinishDate => {
                    proposal.finish_date = Some(parse_datetime(TaskField::FinishDate, raw)?);
                }
                TaskField::UserId => {
                    let owner = raw
                        .parse::<UserId>()
                        .map_err(|_| MalformedInput::InvalidUserId(raw.to_owned()))?;
                    proposal.user_id = Some(owner);
                }
            }
        }
        Ok(proposal)
    }

    /// Proposes a new title.
    #[must_use]
    pub fn with_task_name(mut self, task_name: impl Into<String>) -> Self {
        self.task_name = Some(task_name.into());
        self
    }

    /// Proposes a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Proposes a new status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Proposes a new priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Proposes a new planned start.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: NaiveDateTime) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Proposes a new planned finish.
    #[must_use]
    pub const fn with_finish_date(mut self, finish_date: NaiveDateTime) -> Self {
        self.finish_date = Some(finish_date);
        self
    }

    /// Proposes a new owner.
    #[must_use]
    pub const fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Returns the proposed title.
    #[must_use]
    pub fn task_name(&self) -> Option<&str> {
        self.task_name.as_deref()
    }

    /// Returns the proposed description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the proposed status.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the proposed priority.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the proposed planned start.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDateTime> {
        self.start_date
    }

    /// Returns the proposed planned finish.
    #[must_use]
    pub const fn finish_date(&self) -> Option<NaiveDateTime> {
        self.finish_date
    }

    /// Returns the proposed owner.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

fn submitted_value(
    form: &TaskEditForm,
    policy: FieldPolicy,
) -> Result<Option<&str>, MalformedInput> {
    match form.get(policy.field) {
        None if policy.required => Err(MalformedInput::MissingField(policy.field)),
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() && policy.on_blank == BlankInput::KeepCurrent => {
            Ok(None)
        }
        Some(raw) => Ok(Some(raw)),
    }
}
