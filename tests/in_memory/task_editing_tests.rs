//! In-memory integration tests for task edits and their history.

use super::helpers::{App, app, seed_user};
use tasktrack::{
    access::CapabilityTable,
    task::{
        domain::{TaskEditForm, TaskField, TaskStatus},
        services::{CreateTaskRequest, TaskServiceError},
    },
    user::domain::Role,
};
use rstest::rstest;

fn form(name: &str, status: &str) -> TaskEditForm {
    TaskEditForm::new()
        .with_field("task_name", name)
        .with_field("description", "Quarterly numbers")
        .with_field("status", status)
        .with_field("priority", "high")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn successive_edits_build_newest_first_history() -> Result<(), eyre::Report> {
    let app = app(CapabilityTable::legacy());
    let owner = seed_user(&app, "erin", Role::Editor).await?;
    let task = app
        .tasks
        .create_task(
            owner.id(),
            CreateTaskRequest::new("Report")
                .with_description("Quarterly numbers")
                .with_priority("high"),
        )
        .await?;

    app.tasks
        .edit_task(owner.id(), task.id(), &form("Report v2", "waiting"))
        .await?;
    std::thread::sleep(std::time::Duration::from_millis(5));
    app.tasks
        .edit_task(
            owner.id(),
            task.id(),
            &form("Report v2", "completed").with_field("finish_date", "2024-06-30"),
        )
        .await?;

    let detail = app.tasks.task_detail(owner.id(), task.id()).await?;
    let rows: Vec<(TaskField, &str, &str)> = detail
        .history
        .iter()
        .map(|entry| (entry.field(), entry.old_value(), entry.new_value()))
        .collect();
    eyre::ensure!(
        rows == vec![
            (TaskField::Status, "waiting", "completed"),
            (TaskField::FinishDate, "", "2024-06-30 00:00:00"),
            (TaskField::TaskName, "Report", "Report v2"),
        ],
        "unexpected history rows: {rows:?}"
    );
    eyre::ensure!(detail.task.status() == TaskStatus::Completed, "status not saved");
    Ok(())
}

#[rstest]
#[case(CapabilityTable::legacy(), 1)]
#[case(CapabilityTable::editor_views_all(), 2)]
#[tokio::test(flavor = "multi_thread")]
async fn editor_visibility_follows_capability_table(
    #[case] table: CapabilityTable,
    #[case] expected: usize,
) -> Result<(), eyre::Report> {
    let app: App = app(table);
    let editor = seed_user(&app, "erin", Role::Editor).await?;
    let viewer = seed_user(&app, "vera", Role::Viewer).await?;
    app.tasks
        .create_task(editor.id(), CreateTaskRequest::new("Mine"))
        .await?;
    let foreign = app
        .tasks
        .create_task(viewer.id(), CreateTaskRequest::new("Theirs"))
        .await?;

    let listed = app.tasks.list_tasks(editor.id()).await?;
    eyre::ensure!(listed.len() == expected, "editor saw {} tasks", listed.len());

    let edit = app
        .tasks
        .edit_task(editor.id(), foreign.id(), &form("Taken over", "waiting"))
        .await;
    eyre::ensure!(
        matches!(edit, Err(TaskServiceError::Unauthorized { .. })),
        "viewing all must not imply editing all, got {edit:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_reassigns_and_new_owner_gains_access() -> Result<(), eyre::Report> {
    let app = app(CapabilityTable::legacy());
    let admin = seed_user(&app, "ada", Role::Admin).await?;
    let viewer = seed_user(&app, "vera", Role::Viewer).await?;
    let task = app
        .tasks
        .create_task(admin.id(), CreateTaskRequest::new("Handover"))
        .await?;

    let before = app.tasks.list_tasks(viewer.id()).await?;
    eyre::ensure!(before.is_empty(), "viewer should not see the task yet");

    let reassign = TaskEditForm::new()
        .with_field("task_name", "Handover")
        .with_field("description", "")
        .with_field("status", "waiting")
        .with_field("priority", "medium")
        .with_field("user_id", viewer.id().to_string());
    let staged = app.tasks.edit_task(admin.id(), task.id(), &reassign).await?;
    let [entry] = staged.history() else {
        eyre::bail!("expected one history row, got {:?}", staged.history());
    };
    eyre::ensure!(
        (entry.old_value(), entry.new_value()) == ("ada", "vera"),
        "reassignment should record usernames"
    );

    let after = app.tasks.list_tasks(viewer.id()).await?;
    eyre::ensure!(after.len() == 1, "viewer should now own the task");
    let detail = app.tasks.task_detail(viewer.id(), task.id()).await?;
    eyre::ensure!(detail.history.len() == 1, "owner sees the audit trail");
    Ok(())
}
