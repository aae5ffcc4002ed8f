//! Diff and audit engine for task edits.

use super::{
    Task, TaskEditError, TaskEditProposal, TaskField, TaskHistoryEntry, format_datetime,
};
use crate::access::AccessPolicy;
use crate::user::domain::{User, UserId, Username};
use chrono::{DateTime, NaiveDateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;

/// Request-scoped facts an edit is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    actor: &'a User,
    policy: &'a AccessPolicy,
    at: DateTime<Utc>,
}

impl<'a> EditContext<'a> {
    /// Creates a context stamped with the clock's current time.
    #[must_use]
    pub fn new(actor: &'a User, policy: &'a AccessPolicy, clock: &impl Clock) -> Self {
        Self::at(actor, policy, clock.utc())
    }

    /// Creates a context stamped with an explicit time.
    #[must_use]
    pub const fn at(actor: &'a User, policy: &'a AccessPolicy, at: DateTime<Utc>) -> Self {
        Self { actor, policy, at }
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor(&self) -> &User {
        self.actor
    }

    /// Returns the time recorded on history entries.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Usernames resolved ahead of an edit, keyed by user id.
///
/// Reassignment history records usernames rather than ids, so the caller
/// resolves the current and proposed owners before staging the edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerNames {
    names: HashMap<UserId, Username>,
}

impl OwnerNames {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the username of `user`.
    pub fn insert(&mut self, user: &User) {
        self.names.insert(user.id(), user.username().clone());
    }

    /// Returns the recorded username for `id`.
    #[must_use]
    pub fn username_of(&self, id: UserId) -> Option<&Username> {
        self.names.get(&id)
    }
}

impl<'a> FromIterator<&'a User> for OwnerNames {
    fn from_iter<I: IntoIterator<Item = &'a User>>(iter: I) -> Self {
        let mut names = Self::new();
        for user in iter {
            names.insert(user);
        }
        names
    }
}

/// An edited task and the history rows describing the edit, not yet stored.
///
/// Both halves must be persisted together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTaskEdit {
    task: Task,
    history: Vec<TaskHistoryEntry>,
}

impl StagedTaskEdit {
    /// Returns the task after the edit.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the history rows in field check order.
    #[must_use]
    pub fn history(&self) -> &[TaskHistoryEntry] {
        &self.history
    }

    /// Returns whether the edit changed nothing.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.history.is_empty()
    }

    /// Splits the edit into the task and its history rows.
    #[must_use]
    pub fn into_parts(self) -> (Task, Vec<TaskHistoryEntry>) {
        (self.task, self.history)
    }
}

struct Recorder<'a> {
    context: &'a EditContext<'a>,
    task: Task,
    history: Vec<TaskHistoryEntry>,
}

impl Recorder<'_> {
    fn record(&mut self, field: TaskField, old_value: String, new_value: String) {
        self.history.push(TaskHistoryEntry::record(
            self.task.id(),
            self.context.actor.id(),
            self.context.at,
            field,
            old_value,
            new_value,
        ));
    }
}

/// Diffs `proposal` against `current` and stages the result.
///
/// Fields are compared with plain equality in [`TaskField::ALL`] order; each
/// difference is applied to a copy of `current` and recorded as one history
/// entry. A proposed owner is ignored unless the actor may edit every task.
/// `current` is never modified, so a failed edit leaves nothing behind.
///
/// # Errors
///
/// Returns [`TaskEditError::Unauthorized`] before any comparison when the
/// actor may not edit `current`, and [`TaskEditError::UnknownOwner`] when an
/// ownership change involves a user missing from `owners`.
pub fn apply_edit(
    current: &Task,
    proposal: &TaskEditProposal,
    context: &EditContext<'_>,
    owners: &OwnerNames,
) -> Result<StagedTaskEdit, TaskEditError> {
    if !context.policy.may_edit(context.actor, current) {
        return Err(TaskEditError::Unauthorized {
            actor: context.actor.id(),
            task: current.id(),
        });
    }

    let mut recorder = Recorder {
        context,
        task: current.clone(),
        history: Vec::new(),
    };

    diff_text(&mut recorder, TaskField::TaskName, proposal.task_name());
    diff_text(&mut recorder, TaskField::Description, proposal.description());

    if let Some(status) = proposal.status().filter(|s| *s != recorder.task.status()) {
        let old_value = recorder.task.status().as_str().to_owned();
        recorder.task.set_status(status);
        recorder.record(TaskField::Status, old_value, status.as_str().to_owned());
    }

    if let Some(priority) = proposal
        .priority()
        .filter(|p| *p != recorder.task.priority())
    {
        let old_value = recorder.task.priority().as_str().to_owned();
        recorder.task.set_priority(priority);
        recorder.record(TaskField::Priority, old_value, priority.as_str().to_owned());
    }

    diff_date(&mut recorder, TaskField::StartDate, proposal.start_date());
    diff_date(&mut recorder, TaskField::FinishDate, proposal.finish_date());

    let reassignment = proposal
        .user_id()
        .filter(|_| context.policy.can_edit_all(context.actor))
        .filter(|owner| *owner != recorder.task.user_id());
    if let Some(new_owner) = reassignment {
        let previous_owner = recorder.task.user_id();
        let old_name = owners
            .username_of(previous_owner)
            .ok_or(TaskEditError::UnknownOwner(previous_owner))?;
        let new_name = owners
            .username_of(new_owner)
            .ok_or(TaskEditError::UnknownOwner(new_owner))?;
        let (old_value, new_value) = (old_name.to_string(), new_name.to_string());
        recorder.task.set_user_id(new_owner);
        recorder.record(TaskField::UserId, old_value, new_value);
    }

    if !recorder.history.is_empty() {
        recorder.task.touch(context.at);
    }

    Ok(StagedTaskEdit {
        task: recorder.task,
        history: recorder.history,
    })
}

fn diff_text(recorder: &mut Recorder<'_>, field: TaskField, proposed: Option<&str>) {
    let current = match field {
        TaskField::Description => recorder.task.description(),
        _ => recorder.task.task_name(),
    };
    let Some(new_value) = proposed.filter(|value| *value != current) else {
        return;
    };
    let old_value = current.to_owned();
    if field == TaskField::Description {
        recorder.task.set_description(new_value.to_owned());
    } else {
        recorder.task.set_task_name(new_value.to_owned());
    }
    recorder.record(field, old_value, new_value.to_owned());
}

fn diff_date(recorder: &mut Recorder<'_>, field: TaskField, proposed: Option<NaiveDateTime>) {
    let current = match field {
        TaskField::FinishDate => recorder.task.finish_date(),
        _ => recorder.task.start_date(),
    };
    let Some(new_value) = proposed.filter(|value| Some(*value) != current) else {
        return;
    };
    let old_value = current.as_ref().map(format_datetime).unwrap_or_default();
    if field == TaskField::FinishDate {
        recorder.task.set_finish_date(new_value);
    } else {
        recorder.task.set_start_date(new_value);
    }
    recorder.record(field, old_value, format_datetime(&new_value));
}
