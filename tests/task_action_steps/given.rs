//! Given steps for task action BDD scenarios.

use super::world::{TaskActionWorld, run_async, submission};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskwright::task::domain::TaskStatus;

#[given(r#"a task "{id}" with status "{status_key}""#)]
fn task_with_status(
    world: &mut TaskActionWorld,
    id: String,
    status_key: String,
) -> Result<(), eyre::Report> {
    let status = TaskStatus::try_from(status_key.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let mut draft = submission(&id, &format!("scenario task {id}")).with_status(status);
    if status == TaskStatus::Completed {
        let finished_at = draft.created_at;
        draft = draft.with_progress(100).with_completed_at(finished_at);
    }
    run_async(world.intake.submit(draft)).wrap_err("submit scenario task")?;
    Ok(())
}

#[given(r#"a task "{id}" named "{name}""#)]
fn task_named(world: &mut TaskActionWorld, id: String, name: String) -> Result<(), eyre::Report> {
    run_async(world.intake.submit(submission(&id, &name))).wrap_err("submit named task")?;
    Ok(())
}

#[given("the next action fails in transit")]
fn next_action_fails(world: &mut TaskActionWorld) {
    world.faults.push(true);
}
