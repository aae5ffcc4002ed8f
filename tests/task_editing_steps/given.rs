//! Given steps for task editing BDD scenarios.

use super::world::{TaskEditingWorld, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use tasktrack::{
    task::{
        domain::{NewTask, Task, TaskStatus},
        ports::TaskRepository,
    },
    user::{
        domain::{EmailAddress, PasswordHash, Role, User, Username},
        ports::UserRepository,
    },
};

#[given(r#"a user "{name}" with role "{role}""#)]
fn user_with_role(
    world: &mut TaskEditingWorld,
    name: String,
    role: String,
) -> Result<(), eyre::Report> {
    let parsed_role = Role::try_from(role.as_str()).map_err(|err| eyre::eyre!("{err}"))?;
    let user = User::new(
        Username::new(name.as_str())?,
        EmailAddress::new(format!("{name}@example.com"))?,
        PasswordHash::from_encoded("$argon2id$scenario"),
        parsed_role,
        &DefaultClock,
    );
    run_async(world.users.store(&user)).wrap_err("store scenario user")?;
    world.named_users.insert(name, user);
    Ok(())
}

#[given(r#""{owner}" owns a task named "{task_name}" with status "{status}""#)]
fn owned_task(
    world: &mut TaskEditingWorld,
    owner: String,
    task_name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let parsed_status =
        TaskStatus::try_from(status.as_str()).map_err(|err| eyre::eyre!("{err}"))?;
    let owner_id = world.user(&owner)?.id();
    let task = Task::new(
        NewTask::new(task_name, owner_id).with_status(parsed_status),
        &DefaultClock,
    );
    run_async(world.tasks.store(&task)).wrap_err("store scenario task")?;
    world.task = Some(task);
    Ok(())
}
