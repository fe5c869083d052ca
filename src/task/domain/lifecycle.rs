//! Lifecycle rules: which actions a status offers and what they do.

use super::{ActionDescriptor, Progress, Task, TaskAction, TaskDomainError, TaskStatus};
use mockable::Clock;

/// Returns the menu of user actions for a status, in display order.
#[must_use]
pub const fn available_actions(status: TaskStatus) -> &'static [TaskAction] {
    match status {
        TaskStatus::NotStarted => &[TaskAction::Rerun, TaskAction::Edit, TaskAction::Delete],
        TaskStatus::Pending => &[TaskAction::CancelQueue],
        TaskStatus::Running => &[TaskAction::Stop, TaskAction::View],
        TaskStatus::Completed => &[
            TaskAction::View,
            TaskAction::Export,
            TaskAction::Archive,
            TaskAction::Copy,
        ],
        TaskStatus::Failed => &[
            TaskAction::Rerun,
            TaskAction::Edit,
            TaskAction::View,
            TaskAction::Delete,
        ],
        TaskStatus::Cancelled => &[TaskAction::View, TaskAction::Rerun, TaskAction::Delete],
        TaskStatus::Archived => &[TaskAction::View],
    }
}

/// Returns `true` when the action is in the status menu.
#[must_use]
pub fn is_available(status: TaskStatus, action: TaskAction) -> bool {
    available_actions(status).contains(&action)
}

/// Returns the action menu of a task as presentation descriptors.
#[must_use]
pub fn action_descriptors(task: &Task) -> Vec<ActionDescriptor> {
    available_actions(task.status())
        .iter()
        .copied()
        .map(ActionDescriptor::from)
        .collect()
}

/// Effect of a validated action on the stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// The task is left untouched.
    NoOp,
    /// The task moves to a new status.
    SetStatus(TaskStatus),
    /// The task record is removed permanently.
    Remove,
}

/// A validated action together with the status it was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    action: TaskAction,
    from: TaskStatus,
    effect: TransitionEffect,
}

impl Transition {
    /// Returns the validated action.
    #[must_use]
    pub const fn action(&self) -> TaskAction {
        self.action
    }

    /// Returns the status the action was validated against.
    #[must_use]
    pub const fn from(&self) -> TaskStatus {
        self.from
    }

    /// Returns the effect on the stored task.
    #[must_use]
    pub const fn effect(&self) -> TransitionEffect {
        self.effect
    }

    /// Returns `true` when the effect changes or removes the task.
    #[must_use]
    pub const fn mutates(&self) -> bool {
        !matches!(self.effect, TransitionEffect::NoOp)
    }

    /// Produces the task as it looks after the transition.
    ///
    /// Returns `None` when the transition removes the task. The input task
    /// is never modified.
    #[must_use]
    pub fn apply(&self, task: &Task, clock: &impl Clock) -> Option<Task> {
        let target = match self.effect {
            TransitionEffect::Remove => return None,
            TransitionEffect::NoOp => return Some(task.clone()),
            TransitionEffect::SetStatus(target) => target,
        };

        let mut next = task.clone();
        next.set_status(target);
        match self.action {
            TaskAction::Rerun | TaskAction::Retry => next.set_progress(None),
            TaskAction::CancelQueue => {
                next.set_progress(None);
                next.mark_queued_before();
            }
            TaskAction::Start => {
                next.set_progress(Some(task.progress().unwrap_or(Progress::STARTED)));
            }
            TaskAction::Complete => {
                next.set_progress(Some(Progress::COMPLETE));
                next.set_completed_at(clock.utc());
            }
            _ => {}
        }
        Some(next)
    }
}

/// Validates an action against a task's status and plans its effect.
///
/// Menu actions are legal only when listed by [`available_actions`]. System
/// actions follow their own rules: `start` advances a pending task, `retry`
/// requeues a failed or cancelled task, and `complete`/`fail` settle a
/// running task.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidTransition`] when the action is not
/// legal for the task's status.
pub fn plan_transition(task: &Task, action: TaskAction) -> Result<Transition, TaskDomainError> {
    let from = task.status();
    let effect = effect_for(from, action).ok_or_else(|| TaskDomainError::InvalidTransition {
        task_id: task.id().clone(),
        status: from,
        action,
    })?;
    Ok(Transition {
        action,
        from,
        effect,
    })
}

fn effect_for(status: TaskStatus, action: TaskAction) -> Option<TransitionEffect> {
    use TaskStatus as S;

    let system_target = match (status, action) {
        (S::Pending, TaskAction::Start) => Some(S::Running),
        (S::Failed | S::Cancelled, TaskAction::Retry) => Some(S::Pending),
        (S::Running, TaskAction::Complete) => Some(S::Completed),
        (S::Running, TaskAction::Fail) => Some(S::Failed),
        _ => None,
    };
    if let Some(target) = system_target {
        return Some(TransitionEffect::SetStatus(target));
    }

    if !is_available(status, action) {
        return None;
    }
    let effect = match action {
        TaskAction::Rerun => TransitionEffect::SetStatus(S::Pending),
        TaskAction::CancelQueue => TransitionEffect::SetStatus(S::NotStarted),
        TaskAction::Stop => TransitionEffect::SetStatus(S::Cancelled),
        TaskAction::Archive => TransitionEffect::SetStatus(S::Archived),
        TaskAction::Delete => TransitionEffect::Remove,
        _ => TransitionEffect::NoOp,
    };
    Some(effect)
}
