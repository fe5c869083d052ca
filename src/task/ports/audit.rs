//! Append-only audit log port for executed actions.

use crate::task::domain::{ActionAuditEntry, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for audit log operations.
pub type AuditLogResult<T> = Result<T, AuditLogError>;

/// Audit trail contract.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends an entry. Entries are never modified or removed.
    async fn append(&self, entry: ActionAuditEntry) -> AuditLogResult<()>;

    /// Returns every entry in append order.
    async fn entries(&self) -> AuditLogResult<Vec<ActionAuditEntry>>;

    /// Returns the entries for one task in append order.
    async fn entries_for(&self, task_id: &TaskId) -> AuditLogResult<Vec<ActionAuditEntry>>;
}

/// Errors returned by audit log implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditLogError {
    /// Storage-layer failure.
    #[error("audit storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditLogError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
