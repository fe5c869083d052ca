//! Notifications published while actions run.

use super::{TaskAction, TaskId, TaskStatus};
use serde::Serialize;

/// Lifecycle notification broadcast to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// An action was dispatched and is in flight.
    ActionDispatched {
        /// Target task.
        task_id: TaskId,
        /// Dispatched action.
        action: TaskAction,
    },
    /// An action completed and the task now has `status`.
    ActionSucceeded {
        /// Target task.
        task_id: TaskId,
        /// Completed action.
        action: TaskAction,
        /// Status after the action.
        status: TaskStatus,
    },
    /// An action completed and removed the task.
    TaskRemoved {
        /// Removed task.
        task_id: TaskId,
    },
    /// An action failed and the task was left untouched.
    ActionFailed {
        /// Target task.
        task_id: TaskId,
        /// Failed action.
        action: TaskAction,
        /// Human-readable reason.
        message: String,
    },
    /// A task was added to the store.
    TaskCreated {
        /// New task.
        task_id: TaskId,
    },
}
