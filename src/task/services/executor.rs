//! Action executor: runs one lifecycle action against one task.
//!
//! Every mutating action goes through the same pipeline: validate against
//! the lifecycle rules, claim the task, simulate the backend round trip,
//! then apply the transition to the record as currently stored, guarded by
//! its previous status, in one atomic store write. Every failure after
//! validation, a busy rejection included, is appended to the audit log
//! alongside the successes.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use mockable::Clock;
use tracing::{debug, info, warn};

use crate::task::{
    adapters::fault::{InvalidFailureProbability, RandomFaultInjector},
    config::ExecutorConfig,
    domain::{ActionAuditEntry, Task, TaskAction, TaskEvent, TaskId, Transition, plan_transition},
    ports::{AuditLog, FaultInjector, TaskStore, TaskStoreError},
};

use super::{TaskEventBus, TaskLifecycleError, TaskLifecycleResult};

/// Result of a successfully executed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The task moved to a new state.
    Updated(Task),
    /// The task was removed from the store.
    Removed(TaskId),
    /// The action does not mutate; the current task is returned.
    Unchanged(Task),
    /// A new task was created.
    Created(Task),
}

impl ActionOutcome {
    /// Returns the resulting task, if one still exists.
    #[must_use]
    pub const fn task(&self) -> Option<&Task> {
        match self {
            Self::Updated(task) | Self::Unchanged(task) | Self::Created(task) => Some(task),
            Self::Removed(_) => None,
        }
    }
}

/// Action executor over a task store, audit log and fault injector.
pub struct ActionExecutor<S, A, F, C>
where
    S: TaskStore,
    A: AuditLog,
    F: FaultInjector,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    audit: Arc<A>,
    faults: Arc<F>,
    clock: Arc<C>,
    config: ExecutorConfig,
    events: TaskEventBus,
    in_flight: Arc<Mutex<HashSet<TaskId>>>,
}

impl<S, A, F, C> ActionExecutor<S, A, F, C>
where
    S: TaskStore,
    A: AuditLog,
    F: FaultInjector,
    C: Clock + Send + Sync,
{
    /// Creates an executor.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        audit: Arc<A>,
        faults: Arc<F>,
        clock: Arc<C>,
        config: ExecutorConfig,
        events: TaskEventBus,
    ) -> Self {
        Self {
            store,
            audit,
            faults,
            clock,
            config,
            events,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Returns the executor configuration.
    #[must_use]
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Subscribes to lifecycle notifications.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<TaskEvent> {
        self.events.subscribe()
    }

    /// Returns `true` while an action for `task_id` is in flight.
    #[must_use]
    pub fn is_busy(&self, task_id: &TaskId) -> bool {
        self.in_flight
            .lock()
            .is_ok_and(|in_flight| in_flight.contains(task_id))
    }

    /// Executes `action` against the task `task_id`.
    ///
    /// Actions that do not mutate return immediately. Mutating actions wait
    /// for the simulated round trip and are applied all-or-nothing. No
    /// automatic retry is attempted.
    ///
    /// # Errors
    ///
    /// - [`TaskLifecycleError::NotFound`] when the task does not exist.
    /// - [`TaskLifecycleError::Domain`] with `InvalidTransition` when the
    ///   action is illegal for the task's status; nothing is delayed or
    ///   audited.
    /// - [`TaskLifecycleError::Busy`] when another action for the task is in
    ///   flight; the rejection is audited.
    /// - [`TaskLifecycleError::SimulatedNetworkFailure`],
    ///   [`TaskLifecycleError::Timeout`] or [`TaskLifecycleError::Conflict`]
    ///   when the dispatched action did not take effect.
    pub async fn execute(
        &self,
        action: TaskAction,
        task_id: &TaskId,
    ) -> TaskLifecycleResult<ActionOutcome> {
        let task = self
            .store
            .get(task_id)
            .await?
            .ok_or_else(|| TaskLifecycleError::NotFound(task_id.clone()))?;
        let transition = plan_transition(&task, action)?;
        if !transition.mutates() {
            return Ok(ActionOutcome::Unchanged(task));
        }

        let _claim = match self.claim(task_id) {
            Ok(claim) => claim,
            Err(err) => {
                self.record_failure(task_id, action, &err).await;
                return Err(err);
            }
        };
        debug!(task_id = %task_id, action = %action, status = %task.status(), "dispatching action");
        self.events.publish(TaskEvent::ActionDispatched {
            task_id: task_id.clone(),
            action,
        });

        let result = match self.round_trip(action, task_id).await {
            Ok(()) => self.commit(task_id, transition).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(outcome) => {
                self.record_success(task_id, action, &outcome).await;
                Ok(outcome)
            }
            Err(err) => {
                self.record_failure(task_id, action, &err).await;
                Err(err)
            }
        }
    }

    /// Starts a queued task. Used by schedulers advancing the queue.
    ///
    /// # Errors
    ///
    /// See [`ActionExecutor::execute`].
    pub async fn advance(&self, task_id: &TaskId) -> TaskLifecycleResult<ActionOutcome> {
        self.execute(TaskAction::Start, task_id).await
    }

    /// Returns the audit trail of one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Audit`] when the audit log fails.
    pub async fn audit_trail(&self, task_id: &TaskId) -> TaskLifecycleResult<Vec<ActionAuditEntry>> {
        Ok(self.audit.entries_for(task_id).await?)
    }

    fn claim(&self, task_id: &TaskId) -> TaskLifecycleResult<InFlightClaim> {
        let mut in_flight = self.in_flight.lock().map_err(|err| {
            TaskLifecycleError::Store(TaskStoreError::storage(std::io::Error::other(
                err.to_string(),
            )))
        })?;
        if !in_flight.insert(task_id.clone()) {
            return Err(TaskLifecycleError::Busy(task_id.clone()));
        }
        Ok(InFlightClaim {
            in_flight: Arc::clone(&self.in_flight),
            task_id: task_id.clone(),
        })
    }

    async fn round_trip(&self, action: TaskAction, task_id: &TaskId) -> TaskLifecycleResult<()> {
        let latency = self.config.round_trip_latency;
        let attempt = async {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            self.faults.should_fail(action, task_id)
        };

        let failed = match self.config.action_timeout {
            Some(limit) => tokio::time::timeout(limit, attempt).await.map_err(|_| {
                TaskLifecycleError::Timeout {
                    task_id: task_id.clone(),
                    action,
                    limit,
                }
            })?,
            None => attempt.await,
        };

        if failed {
            return Err(TaskLifecycleError::SimulatedNetworkFailure {
                task_id: task_id.clone(),
                action,
            });
        }
        Ok(())
    }

    async fn commit(
        &self,
        task_id: &TaskId,
        transition: Transition,
    ) -> TaskLifecycleResult<ActionOutcome> {
        let clock = &*self.clock;
        let written = self
            .store
            .update_if_status(task_id, transition.from(), |current| {
                transition.apply(current, clock)
            })
            .await
            .map_err(|err| match err {
                TaskStoreError::StatusConflict { task_id: id, .. } => {
                    TaskLifecycleError::Conflict {
                        task_id: id,
                        action: transition.action(),
                    }
                }
                other => TaskLifecycleError::from(other),
            })?;

        Ok(written.map_or_else(
            || ActionOutcome::Removed(task_id.clone()),
            ActionOutcome::Updated,
        ))
    }

    async fn record_success(&self, task_id: &TaskId, action: TaskAction, outcome: &ActionOutcome) {
        let message = match outcome {
            ActionOutcome::Removed(_) => format!("{action} removed task {task_id}"),
            ActionOutcome::Updated(task)
            | ActionOutcome::Unchanged(task)
            | ActionOutcome::Created(task) => {
                format!("{action} moved task {task_id} to {}", task.status())
            }
        };
        info!(task_id = %task_id, action = %action, "{message}");

        let event = match outcome {
            ActionOutcome::Removed(_) => TaskEvent::TaskRemoved {
                task_id: task_id.clone(),
            },
            ActionOutcome::Updated(task)
            | ActionOutcome::Unchanged(task)
            | ActionOutcome::Created(task) => TaskEvent::ActionSucceeded {
                task_id: task_id.clone(),
                action,
                status: task.status(),
            },
        };
        self.events.publish(event);

        let entry = ActionAuditEntry::succeeded(self.clock.utc(), task_id.clone(), action, message);
        self.append_audit(entry).await;
    }

    async fn record_failure(&self, task_id: &TaskId, action: TaskAction, err: &TaskLifecycleError) {
        let message = err.to_string();
        warn!(task_id = %task_id, action = %action, error = %err, "action failed");
        self.events.publish(TaskEvent::ActionFailed {
            task_id: task_id.clone(),
            action,
            message: message.clone(),
        });

        let entry = ActionAuditEntry::failed(self.clock.utc(), task_id.clone(), action, message);
        self.append_audit(entry).await;
    }

    async fn append_audit(&self, entry: ActionAuditEntry) {
        if let Err(err) = self.audit.append(entry).await {
            warn!(error = %err, "failed to append audit entry");
        }
    }
}

impl<S, A, C> ActionExecutor<S, A, RandomFaultInjector, C>
where
    S: TaskStore,
    A: AuditLog,
    C: Clock + Send + Sync,
{
    /// Creates an executor failing randomly with the configured probability.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFailureProbability`] when the configured probability
    /// lies outside `0.0..=1.0`.
    pub fn with_random_faults(
        store: Arc<S>,
        audit: Arc<A>,
        clock: Arc<C>,
        config: ExecutorConfig,
        events: TaskEventBus,
    ) -> Result<Self, InvalidFailureProbability> {
        let faults = RandomFaultInjector::new(config.failure_probability)?;
        Ok(Self::new(store, audit, Arc::new(faults), clock, config, events))
    }
}

/// Marks a task as busy until dropped.
struct InFlightClaim {
    in_flight: Arc<Mutex<HashSet<TaskId>>>,
    task_id: TaskId,
}

impl Drop for InFlightClaim {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&self.task_id);
        }
    }
}
