//! Audit records for executed actions.

use super::{TaskAction, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only audit entry describing an executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAuditEntry {
    /// When the outcome was recorded.
    pub ts: DateTime<Utc>,
    /// Target task.
    pub task_id: TaskId,
    /// Executed action.
    pub action: TaskAction,
    /// Whether the action took effect.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl ActionAuditEntry {
    /// Creates a success entry.
    #[must_use]
    pub fn succeeded(
        ts: DateTime<Utc>,
        task_id: TaskId,
        action: TaskAction,
        message: impl Into<String>,
    ) -> Self {
        Self {
            ts,
            task_id,
            action,
            success: true,
            message: message.into(),
        }
    }

    /// Creates a failure entry.
    #[must_use]
    pub fn failed(
        ts: DateTime<Utc>,
        task_id: TaskId,
        action: TaskAction,
        message: impl Into<String>,
    ) -> Self {
        Self {
            ts,
            task_id,
            action,
            success: false,
            message: message.into(),
        }
    }
}
