//! Lifecycle actions and their presentation descriptors.

use super::ParseTaskActionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation that can be requested against a task.
///
/// Menu actions are offered to users through
/// [`available_actions`](super::available_actions). System actions (`start`,
/// `retry`, `complete`, `fail`) are dispatched by schedulers and retry
/// prompts directly to the executor and never appear in a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Open the task detail view.
    View,
    /// Open the task for editing.
    Edit,
    /// Download the export artifact.
    Export,
    /// Advance a queued task to running.
    Start,
    /// Stop a running task.
    Stop,
    /// Queue the task again.
    Rerun,
    /// Queue a failed task again from a failure notification.
    Retry,
    /// Pull a pending task back out of the queue.
    CancelQueue,
    /// Archive a completed task.
    Archive,
    /// Derive a new task from this one.
    Copy,
    /// Permanently remove the task.
    Delete,
    /// Mark a running task as completed.
    Complete,
    /// Mark a running task as failed.
    Fail,
}

impl TaskAction {
    /// All actions in menu display order.
    pub const ALL: [Self; 13] = [
        Self::View,
        Self::Edit,
        Self::Export,
        Self::Start,
        Self::Stop,
        Self::Rerun,
        Self::Retry,
        Self::CancelQueue,
        Self::Archive,
        Self::Copy,
        Self::Delete,
        Self::Complete,
        Self::Fail,
    ];

    /// Returns the canonical action key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Export => "export",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Rerun => "rerun",
            Self::Retry => "retry",
            Self::CancelQueue => "cancel_queue",
            Self::Archive => "archive",
            Self::Copy => "copy",
            Self::Delete => "delete",
            Self::Complete => "complete",
            Self::Fail => "fail",
        }
    }

    /// Human-readable label shown next to the action.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::View => "View details",
            Self::Edit => "Edit",
            Self::Export => "Export",
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Rerun => "Rerun",
            Self::Retry => "Retry",
            Self::CancelQueue => "Cancel queue",
            Self::Archive => "Archive",
            Self::Copy => "Copy",
            Self::Delete => "Delete",
            Self::Complete => "Complete",
            Self::Fail => "Fail",
        }
    }

    /// Returns `true` for actions that destroy or interrupt work.
    #[must_use]
    pub const fn is_dangerous(self) -> bool {
        matches!(self, Self::Stop | Self::Delete | Self::Archive | Self::CancelQueue)
    }

    /// Returns `true` for actions that must be confirmed before dispatch.
    ///
    /// The confirmation gate parks the menu actions among these. `start`
    /// and `retry` are on no menu, so the gate rejects them; callers that
    /// dispatch them straight to the executor own their confirmation.
    #[must_use]
    pub const fn requires_confirmation(self) -> bool {
        matches!(
            self,
            Self::Start
                | Self::Stop
                | Self::Archive
                | Self::Retry
                | Self::Rerun
                | Self::CancelQueue
                | Self::Delete
        )
    }
}

impl TryFrom<&str> for TaskAction {
    type Error = ParseTaskActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| ParseTaskActionError(value.to_owned()))
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation-neutral description of an offered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    /// Action key.
    pub key: TaskAction,
    /// Display label.
    pub label: &'static str,
    /// Whether the action destroys or interrupts work.
    pub dangerous: bool,
}

impl From<TaskAction> for ActionDescriptor {
    fn from(action: TaskAction) -> Self {
        Self {
            key: action,
            label: action.label(),
            dangerous: action.is_dangerous(),
        }
    }
}
