//! Fault injection port used to simulate transient backend failures.

use crate::task::domain::{TaskAction, TaskId};

/// Decides whether an action attempt should fail.
pub trait FaultInjector: Send + Sync {
    /// Returns `true` when the attempt should fail with a simulated network
    /// error.
    fn should_fail(&self, action: TaskAction, task_id: &TaskId) -> bool;
}
