//! Then steps for task editing BDD scenarios.

use super::world::{TaskEditingWorld, run_async};
use rstest_bdd_macros::then;
use tasktrack::task::{
    domain::{MalformedInput, TaskField},
    ports::TaskRepository,
    services::TaskServiceError,
};

#[then("the edit succeeds")]
fn edit_succeeds(world: &TaskEditingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_edit_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing edit result"))?;
    if let Err(err) = result {
        return Err(eyre::eyre!("expected the edit to succeed, got {err}"));
    }
    Ok(())
}

#[then("the edit is rejected as unauthorized")]
fn edit_is_unauthorized(world: &TaskEditingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_edit_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing edit result"))?;
    if !matches!(result, Err(TaskServiceError::Unauthorized { .. })) {
        return Err(eyre::eyre!("expected Unauthorized error, got {result:?}"));
    }
    Ok(())
}

#[then("the edit is rejected as malformed input")]
fn edit_is_malformed(world: &TaskEditingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_edit_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing edit result"))?;
    if !matches!(
        result,
        Err(TaskServiceError::MalformedInput(MalformedInput::InvalidDate { .. }))
    ) {
        return Err(eyre::eyre!("expected InvalidDate error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the task is named "{task_name}""#)]
fn task_is_named(world: &TaskEditingWorld, task_name: String) -> Result<(), eyre::Report> {
    let id = world.task()?.id();
    let stored = run_async(world.tasks.find_by_id(id))?
        .ok_or_else(|| eyre::eyre!("task {id} disappeared"))?;
    eyre::ensure!(
        stored.task_name() == task_name,
        "expected task name {task_name}, found {}",
        stored.task_name()
    );
    Ok(())
}

#[then("the number of history entries is {count:usize}")]
fn history_count(world: &TaskEditingWorld, count: usize) -> Result<(), eyre::Report> {
    let history = run_async(world.tasks.history_for(world.task()?.id()))?;
    eyre::ensure!(
        history.len() == count,
        "expected {count} history entries, found {}",
        history.len()
    );
    Ok(())
}

#[then(r#"the latest history entry changed "{field}" from "{old_value}" to "{new_value}""#)]
fn latest_entry_changed(
    world: &TaskEditingWorld,
    field: String,
    old_value: String,
    new_value: String,
) -> Result<(), eyre::Report> {
    let expected_field =
        TaskField::try_from(field.as_str()).map_err(|err| eyre::eyre!("{err}"))?;
    let history = run_async(world.tasks.history_for(world.task()?.id()))?;
    let entry = history
        .iter()
        .find(|entry| entry.field() == expected_field)
        .ok_or_else(|| eyre::eyre!("no history entry for {field}"))?;
    eyre::ensure!(
        (entry.old_value(), entry.new_value()) == (old_value.as_str(), new_value.as_str()),
        "expected {old_value} -> {new_value}, found {} -> {}",
        entry.old_value(),
        entry.new_value()
    );
    Ok(())
}
