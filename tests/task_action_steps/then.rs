//! Then steps for task action BDD scenarios.

use super::world::{TaskActionWorld, run_async, task_id};
use rstest_bdd_macros::then;
use taskwright::task::{
    domain::{Task, TaskAction, TaskDomainError, TaskStatus, available_actions},
    ports::TaskStore,
    services::TaskLifecycleError,
};

fn stored(world: &TaskActionWorld, id: &str) -> Result<Task, eyre::Report> {
    run_async(world.store.get(&task_id(id)?))
        .map_err(|err| eyre::eyre!("store read failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("task {id} is missing from the store"))
}

fn parse_action(raw: &str) -> Result<TaskAction, eyre::Report> {
    TaskAction::try_from(raw).map_err(|err| eyre::eyre!("invalid action in scenario: {err}"))
}

#[then(r#"task "{id}" has status "{status}""#)]
fn task_has_status(world: &TaskActionWorld, id: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let task = stored(world, &id)?;
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"task "{id}" has no progress"#)]
fn task_has_no_progress(world: &TaskActionWorld, id: String) -> Result<(), eyre::Report> {
    let task = stored(world, &id)?;
    eyre::ensure!(
        task.progress().is_none(),
        "expected cleared progress, found {:?}",
        task.progress()
    );
    Ok(())
}

#[then(r#"task "{id}" has been queued before"#)]
fn task_queued_before(world: &TaskActionWorld, id: String) -> Result<(), eyre::Report> {
    eyre::ensure!(
        stored(world, &id)?.has_queued_before(),
        "expected task {id} to be marked as queued before"
    );
    Ok(())
}

#[then(r#"the menu of task "{id}" offers "{offered}" but not "{withheld}""#)]
fn menu_offers(
    world: &TaskActionWorld,
    id: String,
    offered: String,
    withheld: String,
) -> Result<(), eyre::Report> {
    let menu = available_actions(stored(world, &id)?.status());
    eyre::ensure!(menu.contains(&parse_action(&offered)?), "{offered} missing from {menu:?}");
    eyre::ensure!(!menu.contains(&parse_action(&withheld)?), "{withheld} present in {menu:?}");
    Ok(())
}

#[then("the request fails with an invalid transition error")]
fn request_rejected(world: &TaskActionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_request
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;
    if !matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::InvalidTransition { .. }))
    ) {
        return Err(eyre::eyre!("expected InvalidTransition error, got {result:?}"));
    }
    Ok(())
}

#[then("the action fails with a simulated network error")]
fn action_failed_in_transit(world: &TaskActionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action outcome"))?;
    if !matches!(
        result,
        Err(TaskLifecycleError::SimulatedNetworkFailure { .. })
    ) {
        return Err(eyre::eyre!("expected simulated network failure, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the audit trail of task "{id}" ends with a failed "{action}""#)]
fn audit_ends_with_failure(
    world: &TaskActionWorld,
    id: String,
    action: String,
) -> Result<(), eyre::Report> {
    let expected = parse_action(&action)?;
    let trail = run_async(world.executor.audit_trail(&task_id(&id)?))
        .map_err(|err| eyre::eyre!("audit read failed: {err}"))?;
    let last = trail
        .last()
        .ok_or_else(|| eyre::eyre!("audit trail of {id} is empty"))?;
    eyre::ensure!(last.action == expected, "expected {expected}, found {}", last.action);
    eyre::ensure!(!last.success, "expected a failed entry");
    Ok(())
}

#[then("no confirmation is pending")]
fn nothing_pending(world: &TaskActionWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.gate.pending_count() == 0,
        "expected no pending confirmations, found {}",
        world.gate.pending_count()
    );
    Ok(())
}

#[then(r#"a task named "{name}" heads the store with status "{status}""#)]
fn copy_heads_store(
    world: &TaskActionWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let listed = run_async(world.store.list()).map_err(|err| eyre::eyre!("list failed: {err}"))?;
    let head = listed
        .first()
        .ok_or_else(|| eyre::eyre!("store is empty"))?;
    eyre::ensure!(head.name() == name, "expected {name} at head, found {}", head.name());
    eyre::ensure!(head.status() == expected, "copy has status {}", head.status());
    Ok(())
}

#[then(r#"the listing contains only task "{id}""#)]
fn listing_contains_only(world: &TaskActionWorld, id: String) -> Result<(), eyre::Report> {
    let ids: Vec<&str> = world
        .last_listing
        .iter()
        .map(|task| task.id().as_str())
        .collect();
    eyre::ensure!(ids == [id.as_str()], "expected only {id}, found {ids:?}");
    Ok(())
}
