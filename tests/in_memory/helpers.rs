//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use taskwright::task::{
    adapters::{
        fault::ScriptedFaultInjector,
        memory::{InMemoryAuditLog, InMemoryTaskStore, StaticProjectDirectory},
    },
    config::ExecutorConfig,
    domain::{NewTask, Priority, TaskStatus, TaskType},
    services::{
        ActionExecutor, ConfirmationGate, TaskCloneService, TaskEventBus, TaskIntakeService,
        TaskQueryService,
    },
};

/// Executor wired to in-memory adapters.
pub type Executor =
    ActionExecutor<InMemoryTaskStore, InMemoryAuditLog, ScriptedFaultInjector, DefaultClock>;

/// Gate wired to in-memory adapters.
pub type Gate =
    ConfirmationGate<InMemoryTaskStore, InMemoryAuditLog, ScriptedFaultInjector, DefaultClock>;

/// Every service of the task core over one shared store.
pub struct Services {
    pub store: Arc<InMemoryTaskStore>,
    pub faults: Arc<ScriptedFaultInjector>,
    pub executor: Arc<Executor>,
    pub gate: Gate,
    pub intake: TaskIntakeService<InMemoryTaskStore>,
    pub queries: TaskQueryService<InMemoryTaskStore, StaticProjectDirectory>,
}

/// Provides fully wired services with instant round trips.
#[fixture]
pub fn services() -> Services {
    wire(ExecutorConfig::immediate())
}

/// Wires the services with `config`.
pub fn wire(config: ExecutorConfig) -> Services {
    let store = Arc::new(InMemoryTaskStore::new());
    let faults = Arc::new(ScriptedFaultInjector::default());
    let clock = Arc::new(DefaultClock);
    let events = TaskEventBus::new(config.event_capacity);
    let executor = Arc::new(ActionExecutor::new(
        Arc::clone(&store),
        Arc::new(InMemoryAuditLog::new()),
        Arc::clone(&faults),
        Arc::clone(&clock),
        config,
        events.clone(),
    ));
    let cloner = Arc::new(TaskCloneService::new(
        Arc::clone(&store),
        clock,
        events.clone(),
    ));
    let projects = StaticProjectDirectory::new()
        .with_project("proj-demand", "Demand planning")
        .with_project("proj-supply", "Supply chain");

    Services {
        gate: ConfirmationGate::new(Arc::clone(&store), Arc::clone(&executor), cloner),
        intake: TaskIntakeService::new(Arc::clone(&store), events),
        queries: TaskQueryService::new(Arc::clone(&store), Arc::new(projects)),
        store,
        faults,
        executor,
    }
}

/// Reference creation instant for submissions.
pub fn created_on(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 10, 0, 0)
        .single()
        .expect("valid creation instant")
}

/// Builds a submission in `status` with progress consistent with it.
pub fn submission(id: &str, name: &str, status: TaskStatus) -> NewTask {
    let draft = NewTask::new(id, name, TaskType::Forecasting, "prophet", created_on(3))
        .with_status(status)
        .with_priority(Priority::Medium)
        .with_project_id("proj-demand")
        .with_dataset("sales_2023", "v1")
        .with_created_by("carol")
        .with_description("integration fixture");
    match status {
        TaskStatus::Completed => draft
            .with_progress(100)
            .with_completed_at(created_on(3) + Duration::hours(6)),
        TaskStatus::Running => draft.with_progress(25),
        _ => draft,
    }
}
