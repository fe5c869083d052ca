//! Filtered listings over a live store.

use eyre::ensure;
use rstest::rstest;
use taskwright::task::{
    domain::{Priority, Task, TaskAction, TaskId, TaskStatus},
    services::{SortField, SortOrder, TaskFilter, TaskSelection, TaskSort},
};

use super::helpers::{Services, created_on, services, submission};

async fn seed(services: &Services) -> eyre::Result<()> {
    let mut legacy = submission("legacy", "Legacy demand model", TaskStatus::Completed);
    legacy.project_id = None;
    legacy.project_name = Some("Demand planning".to_owned());
    services.intake.submit(legacy).await?;

    let mut supply = submission("supply", "Supply buffer", TaskStatus::Failed)
        .with_project_id("proj-supply")
        .with_priority(Priority::High);
    supply.created_at = created_on(9);
    services.intake.submit(supply).await?;

    let mut urgent = submission("urgent", "Urgent demand refresh", TaskStatus::Pending)
        .with_priority(Priority::High);
    urgent.created_at = created_on(5);
    services.intake.submit(urgent).await?;
    Ok(())
}

fn ids(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.id().as_str()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_filter_includes_legacy_records(services: Services) -> eyre::Result<()> {
    seed(&services).await?;

    let listed = services
        .queries
        .list_filtered(
            &TaskFilter::default().with_project_id("proj-demand"),
            TaskSort::default(),
        )
        .await?;

    ensure!(ids(&listed) == ["urgent", "legacy"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_reflects_executed_actions(services: Services) -> eyre::Result<()> {
    seed(&services).await?;
    let pending = TaskFilter::default().with_status(TaskStatus::Pending);
    ensure!(ids(&services.queries.list_filtered(&pending, TaskSort::default()).await?) == ["urgent"]);

    services
        .executor
        .execute(TaskAction::Start, &TaskId::new("urgent")?)
        .await?;

    ensure!(services.queries.list_filtered(&pending, TaskSort::default()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priority_sort_keeps_store_order_for_ties(services: Services) -> eyre::Result<()> {
    seed(&services).await?;

    let listed = services
        .queries
        .list_filtered(
            &TaskFilter::default(),
            TaskSort::new(SortField::Priority, SortOrder::Desc),
        )
        .await?;

    ensure!(ids(&listed) == ["urgent", "supply", "legacy"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn selection_follows_filtered_listing(services: Services) -> eyre::Result<()> {
    seed(&services).await?;
    let mut selection = TaskSelection::new();
    let everything = services
        .queries
        .list_filtered(&TaskFilter::default(), TaskSort::default())
        .await?;
    selection.select_all(&everything);

    let high = services
        .queries
        .list_filtered(
            &TaskFilter::default().with_priority(Priority::High),
            TaskSort::default(),
        )
        .await?;
    selection.retain_visible(&high);

    ensure!(selection.len() == 2);
    ensure!(selection.is_all_selected(&high));
    Ok(())
}
