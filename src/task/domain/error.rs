//! Error types for task domain validation and lifecycle rules.

use super::{TaskAction, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing task values or planning transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is blank.
    #[error("task identifier must not be empty")]
    EmptyTaskId,

    /// The task name is blank.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// A progress value fell outside `0..=100`.
    #[error("invalid progress {0}, expected a percentage between 0 and 100")]
    InvalidProgress(u8),

    /// A completed task must report full progress.
    #[error("task {0} is completed but its progress is not 100")]
    CompletedWithoutFullProgress(TaskId),

    /// The action is not legal for the task's current status.
    #[error("action {action} is not allowed for task {task_id} in status {status}")]
    InvalidTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Current task status.
        status: TaskStatus,
        /// Rejected action.
        action: TaskAction,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task action keys.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task action: {0}")]
pub struct ParseTaskActionError(pub String);
