//! When steps for task action BDD scenarios.

use super::world::{TaskActionWorld, run_async, task_id};
use rstest_bdd_macros::when;
use taskwright::task::{
    domain::TaskAction,
    services::{GateResponse, TaskFilter, TaskSort},
};

#[when(r#"the user requests "{action_key}" on task "{id}""#)]
fn request_action(
    world: &mut TaskActionWorld,
    action_key: String,
    id: String,
) -> Result<(), eyre::Report> {
    let action = TaskAction::try_from(action_key.as_str())
        .map_err(|err| eyre::eyre!("invalid action in scenario: {err}"))?;
    let result = run_async(world.gate.request_action(action, &task_id(&id)?));
    world.pending_handle = match &result {
        Ok(
            GateResponse::AwaitingConfirmation { handle, .. }
            | GateResponse::CopyDraft { handle, .. },
        ) => Some(*handle),
        _ => None,
    };
    world.last_request = Some(result);
    Ok(())
}

#[when("the user confirms the pending action")]
fn confirm_pending(world: &mut TaskActionWorld) -> Result<(), eyre::Report> {
    let handle = world
        .pending_handle
        .ok_or_else(|| eyre::eyre!("no pending confirmation in scenario world"))?;
    world.last_outcome = Some(run_async(world.gate.confirm(handle)));
    Ok(())
}

#[when("the user cancels the pending action")]
fn cancel_pending(world: &mut TaskActionWorld) -> Result<(), eyre::Report> {
    let handle = world
        .pending_handle
        .take()
        .ok_or_else(|| eyre::eyre!("no pending confirmation in scenario world"))?;
    world
        .gate
        .cancel(handle)
        .map_err(|err| eyre::eyre!("cancel failed: {err}"))
}

#[when(r#"the user names the copy "{name}""#)]
fn name_copy(world: &mut TaskActionWorld, name: String) -> Result<(), eyre::Report> {
    let handle = world
        .pending_handle
        .ok_or_else(|| eyre::eyre!("no open copy draft in scenario world"))?;
    world
        .gate
        .update_copy_draft(handle, name, "")
        .map_err(|err| eyre::eyre!("draft update failed: {err}"))?;
    Ok(())
}

#[when(r#"the user searches for "{query}""#)]
fn search(world: &mut TaskActionWorld, query: String) -> Result<(), eyre::Report> {
    let filter = TaskFilter::default().with_search(query);
    world.last_listing = run_async(world.queries.list_filtered(&filter, TaskSort::default()))
        .map_err(|err| eyre::eyre!("query failed: {err}"))?;
    Ok(())
}
