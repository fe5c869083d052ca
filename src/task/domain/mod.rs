//! Domain model for task lifecycle management.
//!
//! The task domain holds the task record, the lifecycle rules deciding which
//! actions each status allows, and the artifacts those actions produce. It
//! has no knowledge of storage, timing or failure simulation.

mod action;
mod audit;
mod error;
mod event;
mod export;
mod ids;
mod lifecycle;
mod status;
mod task;

pub use action::{ActionDescriptor, TaskAction};
pub use audit::ActionAuditEntry;
pub use error::{ParseTaskActionError, ParseTaskStatusError, TaskDomainError};
pub use event::TaskEvent;
pub use export::TaskExport;
pub use ids::{Progress, TaskId};
pub use lifecycle::{
    Transition, TransitionEffect, action_descriptors, available_actions, is_available,
    plan_transition,
};
pub use status::{Priority, TaskStatus, TaskType};
pub use task::{LinkedDataset, NewTask, Task, TaskPatch};
