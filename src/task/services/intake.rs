//! Intake of wizard submissions and detail-view edits.

use std::sync::Arc;

use tracing::info;

use crate::task::{
    domain::{NewTask, Task, TaskEvent, TaskId, TaskPatch},
    ports::TaskStore,
};

use super::{TaskEventBus, TaskLifecycleError, TaskLifecycleResult};

/// Accepts fully formed tasks and descriptive patches from outside the core.
pub struct TaskIntakeService<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    events: TaskEventBus,
}

impl<S> TaskIntakeService<S>
where
    S: TaskStore,
{
    /// Creates an intake service.
    #[must_use]
    pub const fn new(store: Arc<S>, events: TaskEventBus) -> Self {
        Self { store, events }
    }

    /// Validates a wizard submission and inserts it at the head of the store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the submission is invalid
    /// and a store error when the identifier is already taken.
    pub async fn submit(&self, new_task: NewTask) -> TaskLifecycleResult<Task> {
        let task = Task::from_new(new_task)?;
        self.store.insert(&task).await?;
        info!(task_id = %task.id(), status = %task.status(), "task submitted");
        self.events.publish(TaskEvent::TaskCreated {
            task_id: task.id().clone(),
        });
        Ok(task)
    }

    /// Applies a descriptive patch to a stored task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the patch is invalid.
    pub async fn apply_patch(&self, task_id: &TaskId, patch: TaskPatch) -> TaskLifecycleResult<Task> {
        if patch.is_empty() {
            return self
                .store
                .get(task_id)
                .await?
                .ok_or_else(|| TaskLifecycleError::NotFound(task_id.clone()));
        }
        Ok(self.store.patch(task_id, patch).await?)
    }
}
