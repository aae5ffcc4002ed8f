//! Shared fixtures for task unit tests.

use crate::task::domain::{NewTask, Task, TaskPriority, TaskStatus};
use crate::user::domain::{EmailAddress, PasswordHash, Role, User, Username};
use mockable::DefaultClock;

pub(super) fn user(name: &str, role: Role) -> User {
    User::new(
        Username::new(name).expect("valid username"),
        EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
        PasswordHash::from_encoded("$argon2id$test"),
        role,
        &DefaultClock,
    )
}

pub(super) fn draft_task(owner: &User) -> Task {
    Task::new(
        NewTask::new("Draft", owner.id())
            .with_description("First pass")
            .with_status(TaskStatus::Waiting)
            .with_priority(TaskPriority::Medium),
        &DefaultClock,
    )
}
