//! Domain model for tasks and their audit trail.
//!
//! Tasks are edited through a two-step pipeline: a raw string-keyed
//! [`TaskEditForm`] is parsed into a typed [`TaskEditProposal`] under the
//! per-field rules in [`EDIT_POLICY`], then [`apply_edit`] diffs the proposal
//! against the stored task and stages the mutated task together with one
//! [`TaskHistoryEntry`] per changed field. Nothing here touches storage.

mod edit;
mod error;
mod field;
mod form;
mod history;
mod ids;
mod status;
mod task;

pub use edit::{EditContext, OwnerNames, StagedTaskEdit, apply_edit};
pub use error::{MalformedInput, ParseTaskFieldError, TaskEditError};
pub use field::{BlankInput, EDIT_POLICY, FieldPolicy, TaskField};
pub use form::{TaskEditForm, TaskEditProposal, check_task_name, format_datetime, parse_datetime};
pub use history::{PersistedHistoryData, TaskHistoryEntry, order_for_display};
pub use ids::{TaskHistoryId, TaskId};
pub use status::{ParsePriorityError, ParseStatusError, TaskPriority, TaskStatus};
pub use task::{NewTask, PersistedTaskData, Task};
