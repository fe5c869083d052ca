//! Shared world state for task action BDD scenarios.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use taskwright::task::{
    adapters::{
        fault::ScriptedFaultInjector,
        memory::{InMemoryAuditLog, InMemoryTaskStore, StaticProjectDirectory},
    },
    config::ExecutorConfig,
    domain::{NewTask, Task, TaskId, TaskType},
    services::{
        ActionExecutor, ActionOutcome, ConfirmationGate, ConfirmationHandle, GateResponse,
        TaskCloneService, TaskEventBus, TaskIntakeService, TaskLifecycleError, TaskQueryService,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Executor type used by the BDD world.
pub type WorldExecutor =
    ActionExecutor<InMemoryTaskStore, InMemoryAuditLog, ScriptedFaultInjector, DefaultClock>;

/// Gate type used by the BDD world.
pub type WorldGate =
    ConfirmationGate<InMemoryTaskStore, InMemoryAuditLog, ScriptedFaultInjector, DefaultClock>;

/// Scenario world for task action behaviour tests.
pub struct TaskActionWorld {
    pub store: Arc<InMemoryTaskStore>,
    pub faults: Arc<ScriptedFaultInjector>,
    pub executor: Arc<WorldExecutor>,
    pub gate: WorldGate,
    pub intake: TaskIntakeService<InMemoryTaskStore>,
    pub queries: TaskQueryService<InMemoryTaskStore, StaticProjectDirectory>,
    pub pending_handle: Option<ConfirmationHandle>,
    pub last_request: Option<Result<GateResponse, TaskLifecycleError>>,
    pub last_outcome: Option<Result<ActionOutcome, TaskLifecycleError>>,
    pub last_listing: Vec<Task>,
}

impl TaskActionWorld {
    /// Creates a world over an empty store with instant round trips.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let faults = Arc::new(ScriptedFaultInjector::default());
        let clock = Arc::new(DefaultClock);
        let events = TaskEventBus::default();
        let executor = Arc::new(ActionExecutor::new(
            Arc::clone(&store),
            Arc::new(InMemoryAuditLog::new()),
            Arc::clone(&faults),
            Arc::clone(&clock),
            ExecutorConfig::immediate(),
            events.clone(),
        ));
        let cloner = Arc::new(TaskCloneService::new(
            Arc::clone(&store),
            clock,
            events.clone(),
        ));
        let gate = ConfirmationGate::new(Arc::clone(&store), Arc::clone(&executor), cloner);

        Self {
            intake: TaskIntakeService::new(Arc::clone(&store), events),
            queries: TaskQueryService::new(
                Arc::clone(&store),
                Arc::new(StaticProjectDirectory::new()),
            ),
            store,
            faults,
            executor,
            gate,
            pending_handle: None,
            last_request: None,
            last_outcome: None,
            last_listing: Vec::new(),
        }
    }
}

impl Default for TaskActionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskActionWorld {
    TaskActionWorld::default()
}

/// Builds a forecasting submission with fixed descriptive fields.
pub fn submission(id: &str, name: &str) -> NewTask {
    let created_at = Utc
        .with_ymd_and_hms(2024, 5, 6, 8, 30, 0)
        .single()
        .unwrap_or_else(Utc::now);
    NewTask::new(id, name, TaskType::Forecasting, "prophet", created_at)
        .with_dataset("sales_2023", "v1")
        .with_created_by("bdd")
}

/// Parses a scenario task identifier.
pub fn task_id(raw: &str) -> Result<TaskId, eyre::Report> {
    TaskId::new(raw).map_err(|err| eyre::eyre!("invalid task id in scenario: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
