//! Task store port: the canonical collection of task records.

use crate::task::domain::{Task, TaskDomainError, TaskId, TaskPatch, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Ordered task collection contract.
///
/// Stores keep tasks most-recent-first: inserts land at the head and
/// [`TaskStore::list`] returns that order. Every write is atomic per task.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a new task at the head of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the identifier is
    /// already in use.
    async fn insert(&self, task: &Task) -> TaskStoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn get(&self, id: &TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns a snapshot of every task in store order.
    async fn list(&self) -> TaskStoreResult<Vec<Task>>;

    /// Rewrites a task in place if its stored status still equals
    /// `expected`.
    ///
    /// `update` receives the record as currently stored and returns its
    /// replacement, or `None` to remove the record. Reading and writing
    /// happen as one atomic step, so a patch committed in between is never
    /// overwritten. Returns the stored replacement, or `None` on removal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist and
    /// [`TaskStoreError::StatusConflict`] when its status has moved.
    async fn update_if_status<F>(
        &self,
        id: &TaskId,
        expected: TaskStatus,
        update: F,
    ) -> TaskStoreResult<Option<Task>>
    where
        F: FnOnce(&Task) -> Option<Task> + Send;

    /// Applies a descriptive patch and returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist and
    /// [`TaskStoreError::InvalidPatch`] when the patch fails validation.
    async fn patch(&self, id: &TaskId, patch: TaskPatch) -> TaskStoreResult<Task>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored status differs from the one the write was planned against.
    #[error("task {task_id} changed status: expected {expected}, found {actual}")]
    StatusConflict {
        /// Task identifier.
        task_id: TaskId,
        /// Status the caller expected.
        expected: TaskStatus,
        /// Status currently stored.
        actual: TaskStatus,
    },

    /// The patch was rejected by domain validation.
    #[error("invalid patch for task {task_id}: {source}")]
    InvalidPatch {
        /// Task identifier.
        task_id: TaskId,
        /// Validation failure.
        source: TaskDomainError,
    },

    /// Storage-layer failure.
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
