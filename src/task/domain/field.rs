//! Editable task fields and how blank input is treated for each.

use super::ParseTaskFieldError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A task column that can change through an edit.
///
/// Declaration order is the order in which an edit checks fields, and so the
/// order of the history entries one edit produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    /// Task title.
    TaskName,
    /// Free-text description.
    Description,
    /// Progress status.
    Status,
    /// Urgency.
    Priority,
    /// Planned start.
    StartDate,
    /// Planned finish.
    FinishDate,
    /// Owning user.
    UserId,
}

impl TaskField {
    /// Every field in check order.
    pub const ALL: [Self; 7] = [
        Self::TaskName,
        Self::Description,
        Self::Status,
        Self::Priority,
        Self::StartDate,
        Self::FinishDate,
        Self::UserId,
    ];

    /// Returns the form key and the name recorded in history rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskName => "task_name",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::StartDate => "start_date",
            Self::FinishDate => "finish_date",
            Self::UserId => "user_id",
        }
    }

    /// Returns the update rule for this field.
    #[must_use]
    pub const fn policy(self) -> FieldPolicy {
        match self {
            Self::TaskName => EDIT_POLICY[0],
            Self::Description => EDIT_POLICY[1],
            Self::Status => EDIT_POLICY[2],
            Self::Priority => EDIT_POLICY[3],
            Self::StartDate => EDIT_POLICY[4],
            Self::FinishDate => EDIT_POLICY[5],
            Self::UserId => EDIT_POLICY[6],
        }
    }
}

impl TryFrom<&str> for TaskField {
    type Error = ParseTaskFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| ParseTaskFieldError(value.to_owned()))
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a blank submitted value means for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankInput {
    /// The blank value replaces the stored one.
    Overwrite,
    /// The stored value is left as it is.
    KeepCurrent,
}

/// Update rule for one field of a submitted edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    /// Field the rule applies to.
    pub field: TaskField,
    /// Whether the form must carry the key at all.
    pub required: bool,
    /// Treatment of an empty or whitespace-only value.
    pub on_blank: BlankInput,
}

/// Update rules in field check order.
///
/// Text and enumerated fields are always overwritten, even with blank input
/// (for status and priority a blank value then fails to parse). Dates and the
/// owner keep their stored value when the input is blank or absent.
pub const EDIT_POLICY: [FieldPolicy; 7] = [
    FieldPolicy {
        field: TaskField::TaskName,
        required: true,
        on_blank: BlankInput::Overwrite,
    },
    FieldPolicy {
        field: TaskField::Description,
        required: true,
        on_blank: BlankInput::Overwrite,
    },
    FieldPolicy {
        field: TaskField::Status,
        required: true,
        on_blank: BlankInput::Overwrite,
    },
    FieldPolicy {
        field: TaskField::Priority,
        required: true,
        on_blank: BlankInput::Overwrite,
    },
    FieldPolicy {
        field: TaskField::StartDate,
        required: false,
        on_blank: BlankInput::KeepCurrent,
    },
    FieldPolicy {
        field: TaskField::FinishDate,
        required: false,
        on_blank: BlankInput::KeepCurrent,
    },
    FieldPolicy {
        field: TaskField::UserId,
        required: false,
        on_blank: BlankInput::KeepCurrent,
    },
];
