//! Copy service deriving new tasks from existing ones.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::task::{
    domain::{Task, TaskEvent, TaskId},
    ports::TaskStore,
};

use super::{TaskEventBus, TaskLifecycleError, TaskLifecycleResult};

/// Creates fresh tasks from existing ones without touching the source.
pub struct TaskCloneService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    events: TaskEventBus,
}

impl<S, C> TaskCloneService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a clone service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>, events: TaskEventBus) -> Self {
        Self {
            store,
            clock,
            events,
        }
    }

    /// Copies `source_id` into a new `not_started` task at the head of the
    /// store.
    ///
    /// Works from any stored status, archived included.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the source does not
    /// exist, [`TaskLifecycleError::Domain`] when `new_name` is blank, and
    /// store errors when the insert is rejected.
    pub async fn clone_task(
        &self,
        source_id: &TaskId,
        new_name: impl Into<String> + Send,
        new_description: Option<String>,
    ) -> TaskLifecycleResult<Task> {
        let source = self
            .store
            .get(source_id)
            .await?
            .ok_or_else(|| TaskLifecycleError::NotFound(source_id.clone()))?;
        let copy = source.derive_copy(new_name, new_description, &*self.clock)?;
        self.store.insert(&copy).await?;

        info!(source_id = %source_id, task_id = %copy.id(), "task copied");
        self.events.publish(TaskEvent::TaskCreated {
            task_id: copy.id().clone(),
        });
        Ok(copy)
    }
}
