//! Download artifact produced by the `export` action.

use super::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flat JSON export of a task.
///
/// Key names are consumed by existing downstream tools and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExport {
    /// Task identifier.
    pub id: String,
    /// Task display name.
    pub task_name: String,
    /// Lifecycle status key.
    pub status: String,
    /// Owning project identifier.
    pub project_id: Option<String>,
    /// Primary dataset name.
    pub dataset_name: Option<String>,
    /// Primary dataset version.
    pub dataset_version: Option<String>,
    /// Model name.
    pub model_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form description.
    pub description: Option<String>,
}

impl From<&Task> for TaskExport {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            task_name: task.name().to_owned(),
            status: task.status().as_str().to_owned(),
            project_id: task.project_id().map(str::to_owned),
            dataset_name: task.primary_dataset_name().map(str::to_owned),
            dataset_version: task.primary_dataset_version().map(str::to_owned),
            model_name: task.model_name().to_owned(),
            created_at: task.created_at(),
            completed_at: task.completed_at(),
            description: task.description().map(str::to_owned),
        }
    }
}

impl TaskExport {
    /// Serialises the artifact as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
