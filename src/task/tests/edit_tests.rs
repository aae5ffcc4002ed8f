//! Tests for the diff and audit engine.

use crate::access::{AccessPolicy, CapabilityTable};
use crate::task::domain::{
    EditContext, OwnerNames, TaskEditError, TaskEditProposal, TaskField, TaskPriority,
    TaskStatus, apply_edit,
};
use crate::user::domain::{Role, User};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::support::{draft_task, user};

#[fixture]
fn policy() -> AccessPolicy {
    AccessPolicy::new(CapabilityTable::legacy())
}

#[fixture]
fn editor() -> User {
    user("erin", Role::Editor)
}

fn edited_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn date(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid date-time")
}

fn unchanged_proposal() -> TaskEditProposal {
    TaskEditProposal::default()
        .with_task_name("Draft")
        .with_description("First pass")
        .with_status(TaskStatus::Waiting)
        .with_priority(TaskPriority::Medium)
}

#[rstest]
fn renaming_records_only_the_title(policy: AccessPolicy, editor: User) {
    let task = draft_task(&editor);
    let proposal = unchanged_proposal().with_task_name("Final");
    let context = EditContext::at(&editor, &policy, edited_at());

    let staged = apply_edit(&task, &proposal, &context, &OwnerNames::new())
        .expect("owner may edit");

    let [entry] = staged.history() else {
        panic!("expected exactly one history entry, got {:?}", staged.history());
    };
    assert_eq!(entry.field(), TaskField::TaskName);
    assert_eq!(entry.old_value(), "Draft");
    assert_eq!(entry.new_value(), "Final");
    assert_eq!(entry.changed_by(), editor.id());
    assert_eq!(entry.changed_at(), edited_at());
    assert_eq!(entry.task_id(), task.id());
    assert_eq!(staged.task().task_name(), "Final");
    assert_eq!(staged.task().status(), TaskStatus::Waiting);
    assert_eq!(staged.task().updated_at(), edited_at());
    assert_eq!(task.task_name(), "Draft");
}

#[rstest]
fn reapplying_an_edit_records_nothing(policy: AccessPolicy, editor: User) {
    let task = draft_task(&editor);
    let proposal = unchanged_proposal()
        .with_task_name("Final")
        .with_priority(TaskPriority::High)
        .with_start_date(date(4, 9));
    let context = EditContext::at(&editor, &policy, edited_at());

    let first = apply_edit(&task, &proposal, &context, &OwnerNames::new()).expect("first edit");
    let second = apply_edit(first.task(), &proposal, &context, &OwnerNames::new())
        .expect("second edit");

    assert_eq!(first.history().len(), 3);
    assert!(second.is_unchanged());
    assert_eq!(second.task(), first.task());
}

#[rstest]
fn history_matches_exactly_the_differing_fields(policy: AccessPolicy, editor: User) {
    let task = draft_task(&editor);
    let proposal = TaskEditProposal::default()
        .with_task_name("Draft")
        .with_description("Second pass")
        .with_status(TaskStatus::Completed)
        .with_priority(TaskPriority::Medium)
        .with_start_date(date(1, 9))
        .with_finish_date(date(2, 17));
    let context = EditContext::at(&editor, &policy, edited_at());

    let staged = apply_edit(&task, &proposal, &context, &OwnerNames::new()).expect("edit");

    let recorded: Vec<(TaskField, &str, &str)> = staged
        .history()
        .iter()
        .map(|e| (e.field(), e.old_value(), e.new_value()))
        .collect();
    assert_eq!(
        recorded,
        vec![
            (TaskField::Description, "First pass", "Second pass"),
            (TaskField::Status, "waiting", "completed"),
            (TaskField::StartDate, "", "2024-03-01 09:00:00"),
            (TaskField::FinishDate, "", "2024-03-02 17:00:00"),
        ]
    );
}

#[rstest]
fn absent_dates_keep_stored_values(policy: AccessPolicy, editor: User) {
    let task = draft_task(&editor);
    let context = EditContext::at(&editor, &policy, edited_at());
    let scheduled = apply_edit(
        &task,
        &unchanged_proposal().with_start_date(date(5, 8)),
        &context,
        &OwnerNames::new(),
    )
    .expect("schedule");

    let staged = apply_edit(
        scheduled.task(),
        &unchanged_proposal(),
        &context,
        &OwnerNames::new(),
    )
    .expect("edit");

    assert!(staged.is_unchanged());
    assert_eq!(staged.task().start_date(), Some(date(5, 8)));
}

#[rstest]
fn moving_a_date_records_both_renderings(policy: AccessPolicy, editor: User) {
    let task = draft_task(&editor);
    let context = EditContext::at(&editor, &policy, edited_at());
    let scheduled = apply_edit(
        &task,
        &unchanged_proposal().with_finish_date(date(5, 8)),
        &context,
        &OwnerNames::new(),
    )
    .expect("schedule");

    let staged = apply_edit(
        scheduled.task(),
        &unchanged_proposal().with_finish_date(date(6, 18)),
        &context,
        &OwnerNames::new(),
    )
    .expect("reschedule");

    let [entry] = staged.history() else {
        panic!("expected one entry");
    };
    assert_eq!(entry.old_value(), "2024-03-05 08:00:00");
    assert_eq!(entry.new_value(), "2024-03-06 18:00:00");
}

#[rstest]
fn non_owner_viewer_is_refused_before_any_diff(policy: AccessPolicy, editor: User) {
    let task = draft_task(&editor);
    let intruder = user("victor", Role::Viewer);
    let proposal = unchanged_proposal().with_task_name("Hijacked");
    let context = EditContext::at(&intruder, &policy, edited_at());

    let result = apply_edit(&task, &proposal, &context, &OwnerNames::new());

    assert_eq!(
        result,
        Err(TaskEditError::Unauthorized {
            actor: intruder.id(),
            task: task.id(),
        })
    );
    assert_eq!(task.task_name(), "Draft");
}

#[rstest]
fn admin_reassignment_records_usernames(policy: AccessPolicy, editor: User) {
    let task = draft_task(&editor);
    let admin = user("ada", Role::Admin);
    let assignee = user("omar", Role::Viewer);
    let owners: OwnerNames = [&editor, &assignee].into_iter().collect();
    let proposal = unchanged_proposal().with_user_id(assignee.id());
    let context = EditContext::at(&admin, &policy, edited_at());

    let staged = apply_edit(&task, &proposal, &context, &owners).expect("admin may reassign");

    let [entry] = staged.history() else {
        panic!("expected one entry");
    };
    assert_eq!(entry.field(), TaskField::UserId);
    assert_eq!(entry.old_value(), "erin");
    assert_eq!(entry.new_value(), "omar");
    assert_eq!(entry.changed_by(), admin.id());
    assert_eq!(staged.task().user_id(), assignee.id());
}

#[rstest]
fn owner_reassignment_without_edit_all_is_ignored(policy: AccessPolicy, editor: User) {
    let task = draft_task(&editor);
    let other = user("omar", Role::Viewer);
    let proposal = unchanged_proposal().with_user_id(other.id());
    let context = EditContext::at(&editor, &policy, edited_at());

    let staged = apply_edit(&task, &proposal, &context, &OwnerNames::new()).expect("edit");

    assert!(staged.is_unchanged());
    assert_eq!(staged.task().user_id(), editor.id());
}

#[rstest]
fn reassignment_to_unresolved_owner_fails(policy: AccessPolicy, editor: User) {
    let task = draft_task(&editor);
    let admin = user("ada", Role::Admin);
    let stranger = user("zoe", Role::Viewer);
    let owners: OwnerNames = [&editor].into_iter().collect();
    let proposal = unchanged_proposal().with_user_id(stranger.id());
    let context = EditContext::at(&admin, &policy, edited_at());

    let result = apply_edit(&task, &proposal, &context, &owners);

    assert_eq!(result, Err(TaskEditError::UnknownOwner(stranger.id())));
}

#[rstest]
fn editor_view_all_preset_does_not_grant_edit_all(editor: User) {
    let policy = AccessPolicy::new(CapabilityTable::editor_views_all());
    let owner = user("omar", Role::Viewer);
    let task = draft_task(&owner);
    let context = EditContext::at(&editor, &policy, edited_at());

    let result = apply_edit(&task, &unchanged_proposal(), &context, &OwnerNames::new());

    assert!(matches!(result, Err(TaskEditError::Unauthorized { .. })));
}
