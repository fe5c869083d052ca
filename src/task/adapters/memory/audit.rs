//! In-memory append-only audit log.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{ActionAuditEntry, TaskId},
    ports::{AuditLog, AuditLogError, AuditLogResult},
};

/// Thread-safe in-memory audit log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    entries: Arc<RwLock<Vec<ActionAuditEntry>>>,
}

impl InMemoryAuditLog {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn append(&self, entry: ActionAuditEntry) -> AuditLogResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|err| AuditLogError::storage(std::io::Error::other(err.to_string())))?;
        entries.push(entry);
        Ok(())
    }

    async fn entries(&self) -> AuditLogResult<Vec<ActionAuditEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|err| AuditLogError::storage(std::io::Error::other(err.to_string())))?;
        Ok(entries.clone())
    }

    async fn entries_for(&self, task_id: &TaskId) -> AuditLogResult<Vec<ActionAuditEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|err| AuditLogError::storage(std::io::Error::other(err.to_string())))?;
        Ok(entries
            .iter()
            .filter(|entry| &entry.task_id == task_id)
            .cloned()
            .collect())
    }
}
