//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use tasktrack::{
    access::{AccessPolicy, CapabilityTable},
    task::{adapters::memory::InMemoryTaskRepository, services::TaskService},
    user::{
        adapters::{Argon2PasswordHasher, memory::InMemoryUserRepository},
        domain::{Role, User},
        ports::UserRepository,
        services::{AccountRequest, AccountService},
    },
};
use eyre::WrapErr;
use mockable::DefaultClock;

/// Account service wired to in-memory repositories.
pub type Accounts = AccountService<
    InMemoryUserRepository,
    InMemoryTaskRepository,
    Argon2PasswordHasher,
    DefaultClock,
>;

/// Task service wired to in-memory repositories.
pub type Tasks = TaskService<InMemoryTaskRepository, InMemoryUserRepository, DefaultClock>;

/// Both services sharing one pair of repositories.
pub struct App {
    /// Account operations.
    pub accounts: Accounts,
    /// Task operations.
    pub tasks: Tasks,
    /// Direct access to stored users.
    pub users: Arc<InMemoryUserRepository>,
    /// Direct access to stored tasks.
    pub task_repo: Arc<InMemoryTaskRepository>,
}

/// Builds an application over empty repositories.
#[must_use]
pub fn app(table: CapabilityTable) -> App {
    let users = Arc::new(InMemoryUserRepository::new());
    let task_repo = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    let policy = AccessPolicy::new(table);
    App {
        accounts: AccountService::new(
            Arc::clone(&users),
            Arc::clone(&task_repo),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::clone(&clock),
            policy,
        ),
        tasks: TaskService::new(Arc::clone(&task_repo), Arc::clone(&users), clock, policy),
        users,
        task_repo,
    }
}

/// Registers `name` with password `password` and gives it `role`.
///
/// # Errors
///
/// Returns an error if registration or the role update fails.
pub async fn seed_user(app: &App, name: &str, role: Role) -> Result<User, eyre::Report> {
    let mut user = app
        .accounts
        .register(AccountRequest::new(
            name,
            format!("{name}@example.com"),
            "password",
        ))
        .await
        .wrap_err_with(|| format!("register {name}"))?;
    if user.role() != role {
        user.assign_role(role);
        app.users
            .update(&user)
            .await
            .wrap_err_with(|| format!("assign role to {name}"))?;
    }
    Ok(user)
}
