//! Confirmation gate in front of the action executor.
//!
//! Disruptive actions are parked behind a [`ConfirmationHandle`] until the
//! caller confirms or cancels them. `copy` opens an editable draft instead.
//! Read-only actions answer immediately.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::task::{
    domain::{Task, TaskAction, TaskDomainError, TaskExport, TaskId, is_available},
    ports::{AuditLog, FaultInjector, TaskStore, TaskStoreError},
};

use super::{ActionExecutor, ActionOutcome, TaskCloneService, TaskLifecycleError, TaskLifecycleResult};

/// Opaque handle identifying a pending confirmation or copy draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationHandle(Uuid);

impl ConfirmationHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConfirmationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Editable draft for a task copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyDraft {
    /// Name of the new task.
    pub new_name: String,
    /// Description of the new task.
    pub new_description: String,
}

impl CopyDraft {
    /// Creates the default draft for copying `source`.
    #[must_use]
    pub fn for_source(source: &Task) -> Self {
        Self {
            new_name: format!("{}_copy", source.name()),
            new_description: source.description().unwrap_or_default().to_owned(),
        }
    }

    /// Returns `true` when the draft may be submitted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.new_name.trim().is_empty()
    }
}

/// Immediate answer of [`ConfirmationGate::request_action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResponse {
    /// The action waits for [`ConfirmationGate::confirm`].
    AwaitingConfirmation {
        /// Handle to confirm or cancel.
        handle: ConfirmationHandle,
        /// Parked action.
        action: TaskAction,
        /// Target task.
        task_id: TaskId,
    },
    /// A copy draft was opened.
    CopyDraft {
        /// Handle to edit, confirm or cancel.
        handle: ConfirmationHandle,
        /// Initial draft.
        draft: CopyDraft,
    },
    /// The task was opened for viewing or editing.
    Opened {
        /// Requested action.
        action: TaskAction,
        /// Current task.
        task: Task,
    },
    /// The export artifact is ready.
    Exported(TaskExport),
}

#[derive(Debug, Clone)]
enum PendingConfirmation {
    Action { action: TaskAction, task_id: TaskId },
    Copy { source_id: TaskId, draft: CopyDraft },
}

/// Gate holding disruptive actions until explicitly confirmed.
pub struct ConfirmationGate<S, A, F, C>
where
    S: TaskStore,
    A: AuditLog,
    F: FaultInjector,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    executor: Arc<ActionExecutor<S, A, F, C>>,
    cloner: Arc<TaskCloneService<S, C>>,
    pending: Mutex<HashMap<ConfirmationHandle, PendingConfirmation>>,
}

impl<S, A, F, C> ConfirmationGate<S, A, F, C>
where
    S: TaskStore,
    A: AuditLog,
    F: FaultInjector,
    C: Clock + Send + Sync,
{
    /// Creates a gate in front of `executor` and `cloner`.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        executor: Arc<ActionExecutor<S, A, F, C>>,
        cloner: Arc<TaskCloneService<S, C>>,
    ) -> Self {
        Self {
            store,
            executor,
            cloner,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Requests a menu action.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] with `InvalidTransition` when the
    /// action is not on the task's menu.
    pub async fn request_action(
        &self,
        action: TaskAction,
        task_id: &TaskId,
    ) -> TaskLifecycleResult<GateResponse> {
        let task = self.find_task(task_id).await?;
        ensure_available(&task, action)?;
        debug!(task_id = %task_id, action = %action, "action requested");

        if action.requires_confirmation() {
            let handle = self.park(PendingConfirmation::Action {
                action,
                task_id: task_id.clone(),
            })?;
            return Ok(GateResponse::AwaitingConfirmation {
                handle,
                action,
                task_id: task_id.clone(),
            });
        }

        match action {
            TaskAction::Copy => {
                let draft = CopyDraft::for_source(&task);
                let handle = self.park(PendingConfirmation::Copy {
                    source_id: task_id.clone(),
                    draft: draft.clone(),
                })?;
                Ok(GateResponse::CopyDraft { handle, draft })
            }
            TaskAction::Export => Ok(GateResponse::Exported(TaskExport::from(&task))),
            _ => Ok(GateResponse::Opened { action, task }),
        }
    }

    /// Replaces the contents of an open copy draft.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::UnknownConfirmation`] when `handle` does
    /// not refer to an open copy draft.
    pub fn update_copy_draft(
        &self,
        handle: ConfirmationHandle,
        new_name: impl Into<String>,
        new_description: impl Into<String>,
    ) -> TaskLifecycleResult<CopyDraft> {
        let mut pending = self.lock_pending()?;
        match pending.get_mut(&handle) {
            Some(PendingConfirmation::Copy { draft, .. }) => {
                draft.new_name = new_name.into();
                draft.new_description = new_description.into();
                Ok(draft.clone())
            }
            _ => Err(TaskLifecycleError::UnknownConfirmation(handle)),
        }
    }

    /// Confirms a parked action or submits a copy draft.
    ///
    /// A copy draft with an empty name is rejected and stays open so it can
    /// be corrected. Any other outcome settles the handle.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::UnknownConfirmation`] for unknown
    /// handles, [`TaskLifecycleError::Domain`] with `EmptyTaskName` for an
    /// unnamed copy draft, and any executor or clone-service error.
    pub async fn confirm(&self, handle: ConfirmationHandle) -> TaskLifecycleResult<ActionOutcome> {
        let settled = {
            let mut pending = self.lock_pending()?;
            let entry = pending
                .remove(&handle)
                .ok_or(TaskLifecycleError::UnknownConfirmation(handle))?;
            let unnamed_copy = matches!(
                &entry,
                PendingConfirmation::Copy { draft, .. } if !draft.can_submit()
            );
            if unnamed_copy {
                pending.insert(handle, entry);
                return Err(TaskDomainError::EmptyTaskName.into());
            }
            entry
        };
        debug!(handle = %handle, "confirmation accepted");

        match settled {
            PendingConfirmation::Action { action, task_id } => {
                self.executor.execute(action, &task_id).await
            }
            PendingConfirmation::Copy { source_id, draft } => {
                let description =
                    Some(draft.new_description).filter(|text| !text.trim().is_empty());
                self.cloner
                    .clone_task(&source_id, draft.new_name, description)
                    .await
                    .map(ActionOutcome::Created)
            }
        }
    }

    /// Discards a parked action or copy draft without touching any task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::UnknownConfirmation`] for unknown
    /// handles.
    pub fn cancel(&self, handle: ConfirmationHandle) -> TaskLifecycleResult<()> {
        if self.lock_pending()?.remove(&handle).is_none() {
            return Err(TaskLifecycleError::UnknownConfirmation(handle));
        }
        debug!(handle = %handle, "confirmation cancelled");
        Ok(())
    }

    /// Returns the number of open confirmations and drafts.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map_or(0, |pending| pending.len())
    }

    /// Produces the export artifact of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] with `InvalidTransition` when the task
    /// cannot be exported in its status.
    pub async fn export_task(&self, task_id: &TaskId) -> TaskLifecycleResult<TaskExport> {
        let task = self.find_task(task_id).await?;
        ensure_available(&task, TaskAction::Export)?;
        Ok(TaskExport::from(&task))
    }

    async fn find_task(&self, task_id: &TaskId) -> TaskLifecycleResult<Task> {
        self.store
            .get(task_id)
            .await?
            .ok_or_else(|| TaskLifecycleError::NotFound(task_id.clone()))
    }

    fn park(&self, entry: PendingConfirmation) -> TaskLifecycleResult<ConfirmationHandle> {
        let handle = ConfirmationHandle::new();
        self.lock_pending()?.insert(handle, entry);
        Ok(handle)
    }

    fn lock_pending(
        &self,
    ) -> TaskLifecycleResult<MutexGuard<'_, HashMap<ConfirmationHandle, PendingConfirmation>>>
    {
        self.pending.lock().map_err(|err| {
            TaskLifecycleError::Store(TaskStoreError::storage(std::io::Error::other(
                err.to_string(),
            )))
        })
    }
}

fn ensure_available(task: &Task, action: TaskAction) -> Result<(), TaskDomainError> {
    if is_available(task.status(), action) {
        return Ok(());
    }
    Err(TaskDomainError::InvalidTransition {
        task_id: task.id().clone(),
        status: task.status(),
        action,
    })
}
