//! Application services for task lifecycle orchestration.

mod clone;
mod error;
mod events;
mod executor;
mod gate;
mod intake;
mod query;

pub use clone::TaskCloneService;
pub use error::{TaskLifecycleError, TaskLifecycleErrorKind, TaskLifecycleResult};
pub use events::TaskEventBus;
pub use executor::{ActionExecutor, ActionOutcome};
pub use gate::{ConfirmationGate, ConfirmationHandle, CopyDraft, GateResponse};
pub use intake::TaskIntakeService;
pub use query::{
    DateRange, SortField, SortOrder, TaskFilter, TaskQueryService, TaskSelection, TaskSort,
    apply_query,
};
