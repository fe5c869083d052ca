//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod audit;
pub mod fault;
pub mod project;
pub mod store;

pub use audit::{AuditLog, AuditLogError, AuditLogResult};
pub use fault::FaultInjector;
pub use project::ProjectDirectory;
pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
