//! In-memory task store keeping most-recent-first order.

use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Task, TaskId, TaskPatch, TaskStatus},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `tasks` in the given order.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(tasks.into_iter().collect())),
        }
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, Vec<Task>>> {
        self.tasks
            .read()
            .map_err(|err| TaskStoreError::storage(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, Vec<Task>>> {
        self.tasks
            .write()
            .map_err(|err| TaskStoreError::storage(std::io::Error::other(err.to_string())))
    }
}

/// Returns the slot of `id` after checking its status matches `expected`.
fn locate_with_status(
    tasks: &[Task],
    id: &TaskId,
    expected: TaskStatus,
) -> TaskStoreResult<usize> {
    let position = tasks
        .iter()
        .position(|task| task.id() == id)
        .ok_or_else(|| TaskStoreError::NotFound(id.clone()))?;
    let actual = tasks
        .get(position)
        .map(Task::status)
        .ok_or_else(|| TaskStoreError::NotFound(id.clone()))?;
    if actual != expected {
        return Err(TaskStoreError::StatusConflict {
            task_id: id.clone(),
            expected,
            actual,
        });
    }
    Ok(position)
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: &Task) -> TaskStoreResult<()> {
        let mut tasks = self.write()?;
        if tasks.iter().any(|existing| existing.id() == task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id().clone()));
        }
        tasks.insert(0, task.clone());
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> TaskStoreResult<Option<Task>> {
        let tasks = self.read()?;
        Ok(tasks.iter().find(|task| task.id() == id).cloned())
    }

    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        Ok(self.read()?.clone())
    }

    async fn update_if_status<F>(
        &self,
        id: &TaskId,
        expected: TaskStatus,
        update: F,
    ) -> TaskStoreResult<Option<Task>>
    where
        F: FnOnce(&Task) -> Option<Task> + Send,
    {
        let mut tasks = self.write()?;
        let position = locate_with_status(&tasks, id, expected)?;
        let replacement = tasks.get(position).and_then(update);
        match &replacement {
            Some(next) => {
                if let Some(slot) = tasks.get_mut(position) {
                    *slot = next.clone();
                }
            }
            None => {
                tasks.remove(position);
            }
        }
        Ok(replacement)
    }

    async fn patch(&self, id: &TaskId, patch: TaskPatch) -> TaskStoreResult<Task> {
        let mut tasks = self.write()?;
        let slot = tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or_else(|| TaskStoreError::NotFound(id.clone()))?;
        let mut updated = slot.clone();
        updated
            .apply_patch(patch)
            .map_err(|source| TaskStoreError::InvalidPatch {
                task_id: id.clone(),
                source,
            })?;
        *slot = updated.clone();
        Ok(updated)
    }
}
