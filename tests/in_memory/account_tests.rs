//! In-memory integration tests for account management.

use super::helpers::{App, app, seed_user};
use tasktrack::{
    access::CapabilityTable,
    task::{ports::TaskRepository, services::CreateTaskRequest},
    user::{
        domain::Role,
        services::{AccountRequest, AccountServiceError},
    },
};
use rstest::{fixture, rstest};

#[fixture]
fn legacy_app() -> App {
    app(CapabilityTable::legacy())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_user_can_log_in_with_argon2_hash(legacy_app: App) -> Result<(), eyre::Report> {
    let user = seed_user(&legacy_app, "alice", Role::Viewer).await?;

    eyre::ensure!(
        user.password_hash().as_str().starts_with("$argon2id$"),
        "password should be stored as an Argon2id PHC string"
    );
    let logged_in = legacy_app
        .accounts
        .authenticate("alice@example.com", "password")
        .await?;
    eyre::ensure!(logged_in.id() == user.id(), "login returned another user");

    let wrong = legacy_app
        .accounts
        .authenticate("alice@example.com", "passw0rd")
        .await;
    eyre::ensure!(
        matches!(wrong, Err(AccountServiceError::InvalidCredentials)),
        "wrong password should be rejected, got {wrong:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn editor_cannot_manage_accounts(legacy_app: App) -> Result<(), eyre::Report> {
    let editor = seed_user(&legacy_app, "erin", Role::Editor).await?;

    let result = legacy_app.accounts.list_users(editor.id()).await;

    eyre::ensure!(
        matches!(result, Err(AccountServiceError::Forbidden(_))),
        "editor should not list users, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_user_cascades_to_their_tasks(legacy_app: App) -> Result<(), eyre::Report> {
    let admin = seed_user(&legacy_app, "ada", Role::Admin).await?;
    let target = legacy_app
        .accounts
        .add_user(
            admin.id(),
            AccountRequest::new("vera", "vera@example.com", "password"),
        )
        .await?;
    let doomed = legacy_app
        .tasks
        .create_task(target.id(), CreateTaskRequest::new("Doomed"))
        .await?;
    let form = tasktrack::task::domain::TaskEditForm::new()
        .with_field("task_name", "Doomed for sure")
        .with_field("description", "")
        .with_field("status", "waiting")
        .with_field("priority", "low");
    legacy_app
        .tasks
        .edit_task(target.id(), doomed.id(), &form)
        .await?;
    let survivor = legacy_app
        .tasks
        .create_task(admin.id(), CreateTaskRequest::new("Survivor"))
        .await?;

    legacy_app.accounts.delete_user(admin.id(), target.id()).await?;

    let remaining = legacy_app.task_repo.list().await?;
    eyre::ensure!(remaining == vec![survivor], "only the admin's task should remain");
    let history = legacy_app.task_repo.history_for(doomed.id()).await?;
    eyre::ensure!(history.is_empty(), "deleted task history should be gone");
    let users = legacy_app.accounts.list_users(admin.id()).await?;
    eyre::ensure!(users.len() == 1, "only the admin should remain");
    Ok(())
}
