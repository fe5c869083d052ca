//! End-to-end action flows through the gate and executor.

use std::time::Duration;

use eyre::{bail, ensure};
use rstest::rstest;
use taskwright::task::{
    config::ExecutorConfig,
    domain::{Progress, TaskAction, TaskEvent, TaskId, TaskStatus},
    ports::TaskStore,
    services::{ActionOutcome, GateResponse, TaskLifecycleError, TaskLifecycleErrorKind},
};

use super::helpers::{Services, services, submission, wire};

fn id(raw: &str) -> TaskId {
    TaskId::new(raw).expect("valid task id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queued_task_runs_to_completion(services: Services) -> eyre::Result<()> {
    let task = services
        .intake
        .submit(submission("flow-1", "Quarterly forecast", TaskStatus::Failed))
        .await?;
    let mut events = services.executor.subscribe();

    let GateResponse::AwaitingConfirmation { handle, .. } = services
        .gate
        .request_action(TaskAction::Rerun, task.id())
        .await?
    else {
        bail!("rerun should wait for confirmation");
    };
    services.gate.confirm(handle).await?;
    let started = services.executor.advance(task.id()).await?;
    let finished = services
        .executor
        .execute(TaskAction::Complete, task.id())
        .await?;

    ensure!(started.task().and_then(|t| t.progress()) == Some(Progress::STARTED));
    let ActionOutcome::Updated(done) = finished else {
        bail!("completion should update the task");
    };
    ensure!(done.status() == TaskStatus::Completed);
    ensure!(done.progress() == Some(Progress::COMPLETE));
    ensure!(done.completed_at().is_some());

    let trail = services.executor.audit_trail(task.id()).await?;
    let actions: Vec<TaskAction> = trail.iter().map(|entry| entry.action).collect();
    ensure!(actions == [TaskAction::Rerun, TaskAction::Start, TaskAction::Complete]);
    ensure!(trail.iter().all(|entry| entry.success));

    let mut succeeded = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, TaskEvent::ActionSucceeded { .. }) {
            succeeded += 1;
        }
    }
    ensure!(succeeded == 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_round_trip_can_be_retried_by_hand(services: Services) -> eyre::Result<()> {
    services
        .intake
        .submit(submission("flow-2", "Inventory rebalance", TaskStatus::Running))
        .await?;
    services.faults.push(true);

    let first = services.executor.execute(TaskAction::Stop, &id("flow-2")).await;
    let Err(err) = first else {
        bail!("first stop should fail in transit");
    };
    ensure!(err.kind() == TaskLifecycleErrorKind::Transient);
    ensure!(
        services.store.get(&id("flow-2")).await?.map(|t| t.status()) == Some(TaskStatus::Running)
    );

    services.executor.execute(TaskAction::Stop, &id("flow-2")).await?;

    ensure!(
        services.store.get(&id("flow-2")).await?.map(|t| t.status())
            == Some(TaskStatus::Cancelled)
    );
    ensure!(services.faults.remaining() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn confirmed_delete_removes_task(services: Services) -> eyre::Result<()> {
    services
        .intake
        .submit(submission("flow-3", "Obsolete draft", TaskStatus::NotStarted))
        .await?;

    let GateResponse::AwaitingConfirmation { handle, .. } = services
        .gate
        .request_action(TaskAction::Delete, &id("flow-3"))
        .await?
    else {
        bail!("delete should wait for confirmation");
    };
    let outcome = services.gate.confirm(handle).await?;

    ensure!(outcome == ActionOutcome::Removed(id("flow-3")));
    ensure!(services.store.get(&id("flow-3")).await?.is_none());
    let again = services.gate.request_action(TaskAction::View, &id("flow-3")).await;
    ensure!(matches!(again, Err(TaskLifecycleError::NotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_round_trip_times_out_without_mutation() -> eyre::Result<()> {
    let services = wire(
        ExecutorConfig::immediate()
            .with_latency(Duration::from_millis(200))
            .with_timeout(Some(Duration::from_millis(20))),
    );
    services
        .intake
        .submit(submission("flow-4", "Slow archive", TaskStatus::Completed))
        .await?;

    let result = services
        .executor
        .execute(TaskAction::Archive, &id("flow-4"))
        .await;

    ensure!(matches!(result, Err(TaskLifecycleError::Timeout { .. })));
    ensure!(
        services.store.get(&id("flow-4")).await?.map(|t| t.status())
            == Some(TaskStatus::Completed)
    );
    ensure!(!services.executor.is_busy(&id("flow-4")));
    Ok(())
}
