//! Service-level errors shared by the task services.

use std::time::Duration;

use crate::task::{
    domain::{TaskAction, TaskDomainError, TaskId},
    ports::{AuditLogError, TaskStoreError},
};
use thiserror::Error;

use super::gate::ConfirmationHandle;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed, including illegal transitions.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// Another action for the same task is still in flight.
    #[error("an action is already in flight for task {0}")]
    Busy(TaskId),

    /// The simulated backend rejected the attempt.
    #[error("network failure while running {action} on task {task_id}, please retry")]
    SimulatedNetworkFailure {
        /// Target task.
        task_id: TaskId,
        /// Attempted action.
        action: TaskAction,
    },

    /// The simulated backend did not answer in time.
    #[error("{action} on task {task_id} timed out after {limit:?}")]
    Timeout {
        /// Target task.
        task_id: TaskId,
        /// Attempted action.
        action: TaskAction,
        /// Configured bound.
        limit: Duration,
    },

    /// The task changed status while the action was in flight.
    #[error("task {task_id} changed status while {action} was in flight")]
    Conflict {
        /// Target task.
        task_id: TaskId,
        /// Attempted action.
        action: TaskAction,
    },

    /// The confirmation handle is unknown or already settled.
    #[error("no pending confirmation for handle {0}")]
    UnknownConfirmation(ConfirmationHandle),

    /// Task store operation failed.
    #[error(transparent)]
    Store(TaskStoreError),

    /// Audit log operation failed.
    #[error(transparent)]
    Audit(#[from] AuditLogError),
}

/// Coarse classification of [`TaskLifecycleError`] for callers that only
/// need to pick a notification style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskLifecycleErrorKind {
    /// The action is not legal for the task's status.
    InvalidTransition,
    /// Input failed validation.
    Validation,
    /// The task does not exist.
    NotFound,
    /// Transient failure; the identical action may be dispatched again.
    Transient,
    /// Storage or audit infrastructure failed.
    Internal,
}

impl TaskLifecycleError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> TaskLifecycleErrorKind {
        match self {
            Self::Domain(TaskDomainError::InvalidTransition { .. }) => {
                TaskLifecycleErrorKind::InvalidTransition
            }
            Self::Domain(_) | Self::UnknownConfirmation(_) => TaskLifecycleErrorKind::Validation,
            Self::NotFound(_) => TaskLifecycleErrorKind::NotFound,
            Self::Busy(_)
            | Self::SimulatedNetworkFailure { .. }
            | Self::Timeout { .. }
            | Self::Conflict { .. } => TaskLifecycleErrorKind::Transient,
            Self::Store(_) | Self::Audit(_) => TaskLifecycleErrorKind::Internal,
        }
    }

    /// Returns `true` when dispatching the identical action again may
    /// succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), TaskLifecycleErrorKind::Transient)
    }
}

impl From<TaskStoreError> for TaskLifecycleError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::NotFound(task_id) => Self::NotFound(task_id),
            TaskStoreError::InvalidPatch { source, .. } => Self::Domain(source),
            other => Self::Store(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;
