//! When steps for task editing BDD scenarios.

use super::world::{TaskEditingWorld, run_async};
use rstest_bdd_macros::when;
use tasktrack::task::domain::TaskEditForm;

fn base_form(
    world: &TaskEditingWorld,
    task_name: &str,
    status: &str,
) -> Result<TaskEditForm, eyre::Report> {
    let task = world.task()?;
    Ok(TaskEditForm::new()
        .with_field("task_name", task_name)
        .with_field("description", task.description())
        .with_field("status", status)
        .with_field("priority", task.priority().as_str()))
}

fn submit(
    world: &mut TaskEditingWorld,
    actor: &str,
    form: &TaskEditForm,
) -> Result<(), eyre::Report> {
    let actor_id = world.user(actor)?.id();
    let task_id = world.task()?.id();
    let result = run_async(world.service.edit_task(actor_id, task_id, form));
    world.last_edit_result = Some(result);
    Ok(())
}

#[when(r#""{actor}" submits the name "{task_name}" with status "{status}""#)]
fn submit_name_and_status(
    world: &mut TaskEditingWorld,
    actor: String,
    task_name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let form = base_form(world, &task_name, &status)?;
    submit(world, &actor, &form)
}

#[when(r#""{actor}" submits the name "{task_name}" with start date "{start_date}""#)]
fn submit_name_and_start_date(
    world: &mut TaskEditingWorld,
    actor: String,
    task_name: String,
    start_date: String,
) -> Result<(), eyre::Report> {
    let status = world.task()?.status().as_str();
    let form = base_form(world, &task_name, status)?.with_field("start_date", start_date);
    submit(world, &actor, &form)
}

#[when(r#""{actor}" reassigns the task to "{new_owner}""#)]
fn reassign_task(
    world: &mut TaskEditingWorld,
    actor: String,
    new_owner: String,
) -> Result<(), eyre::Report> {
    let owner_id = world.user(&new_owner)?.id();
    let task = world.task()?;
    let (task_name, status) = (task.task_name().to_owned(), task.status().as_str());
    let form = base_form(world, &task_name, status)?.with_field("user_id", owner_id.to_string());
    submit(world, &actor, &form)
}
