//! Task aggregate root, creation payload and descriptive patches.

use super::{Priority, Progress, TaskDomainError, TaskId, TaskStatus, TaskType};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Dataset linked to a task by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkedDataset {
    /// Dataset identifier.
    pub id: String,
    /// Dataset display name.
    pub name: String,
    /// Dataset version label.
    pub version: String,
}

impl LinkedDataset {
    /// Creates a linked dataset reference.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Task aggregate root.
///
/// Deserialised records pass through the same validation as
/// [`Task::from_new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NewTask")]
pub struct Task {
    id: TaskId,
    name: String,
    #[serde(rename = "type")]
    task_type: TaskType,
    project_id: Option<String>,
    project_name: Option<String>,
    dataset_name: Option<String>,
    dataset_version: Option<String>,
    linked_datasets: Vec<LinkedDataset>,
    model_name: String,
    priority: Priority,
    status: TaskStatus,
    progress: Option<Progress>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    created_by: String,
    description: Option<String>,
    has_queued_before: bool,
}

/// Fully-formed task record submitted by the creation wizard.
///
/// Also the unvalidated wire shape of a stored [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task identifier chosen by the wizard.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Kind of ML work.
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Owning project identifier.
    pub project_id: Option<String>,
    /// Owning project display name, carried by legacy records.
    pub project_name: Option<String>,
    /// Primary dataset name.
    pub dataset_name: Option<String>,
    /// Primary dataset version.
    pub dataset_version: Option<String>,
    /// Additional linked datasets.
    #[serde(default)]
    pub linked_datasets: Vec<LinkedDataset>,
    /// Model name.
    pub model_name: String,
    /// Scheduling priority.
    pub priority: Priority,
    /// Initial lifecycle status.
    pub status: TaskStatus,
    /// Initial progress.
    pub progress: Option<u8>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Author.
    #[serde(default)]
    pub created_by: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Whether the task was ever pulled back out of the queue.
    #[serde(default)]
    pub has_queued_before: bool,
}

impl NewTask {
    /// Creates a payload with required fields and neutral defaults.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        task_type: TaskType,
        model_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            task_type,
            project_id: None,
            project_name: None,
            dataset_name: None,
            dataset_version: None,
            linked_datasets: Vec::new(),
            model_name: model_name.into(),
            priority: Priority::Medium,
            status: TaskStatus::NotStarted,
            progress: None,
            created_at,
            completed_at: None,
            created_by: String::new(),
            description: None,
            has_queued_before: false,
        }
    }

    /// Sets the lifecycle status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the progress percentage.
    #[must_use]
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the owning project identifier.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the owning project display name.
    #[must_use]
    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    /// Sets the primary dataset.
    #[must_use]
    pub fn with_dataset(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.dataset_name = Some(name.into());
        self.dataset_version = Some(version.into());
        self
    }

    /// Sets the linked datasets.
    #[must_use]
    pub fn with_linked_datasets(mut self, datasets: impl IntoIterator<Item = LinkedDataset>) -> Self {
        self.linked_datasets = datasets.into_iter().collect();
        self
    }

    /// Sets the completion timestamp.
    #[must_use]
    pub fn with_completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Descriptive fields a detail view may change after creation.
///
/// Lifecycle fields are deliberately absent: status and progress only move
/// through the lifecycle controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Replacement model name.
    pub model_name: Option<String>,
    /// Replacement primary dataset `(name, version)`.
    pub dataset: Option<(String, String)>,
    /// Replacement linked datasets.
    pub linked_datasets: Option<Vec<LinkedDataset>>,
    /// Replacement project identifier.
    pub project_id: Option<String>,
}

impl TaskPatch {
    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.model_name.is_none()
            && self.dataset.is_none()
            && self.linked_datasets.is_none()
            && self.project_id.is_none()
    }
}

impl Task {
    /// Builds a task from a wizard submission.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the identifier or name is blank, the
    /// progress exceeds 100, or a completed task lacks full progress.
    pub fn from_new(new_task: NewTask) -> Result<Self, TaskDomainError> {
        let id = TaskId::new(new_task.id)?;
        let name = validated_name(new_task.name)?;
        let progress = new_task.progress.map(Progress::new).transpose()?;
        if new_task.status == TaskStatus::Completed && progress != Some(Progress::COMPLETE) {
            return Err(TaskDomainError::CompletedWithoutFullProgress(id));
        }

        Ok(Self {
            id,
            name,
            task_type: new_task.task_type,
            project_id: new_task.project_id,
            project_name: new_task.project_name,
            dataset_name: new_task.dataset_name,
            dataset_version: new_task.dataset_version,
            linked_datasets: new_task.linked_datasets,
            model_name: new_task.model_name,
            priority: new_task.priority,
            status: new_task.status,
            progress,
            created_at: new_task.created_at,
            completed_at: new_task.completed_at,
            created_by: new_task.created_by,
            description: new_task.description,
            has_queued_before: new_task.has_queued_before,
        })
    }

    /// Derives a fresh task from this one.
    ///
    /// Every field is copied except the lifecycle fields, which restart:
    /// new identifier, `not_started`, zero progress, no completion time and
    /// a cleared queue history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] when `new_name` is blank.
    pub fn derive_copy(
        &self,
        new_name: impl Into<String>,
        new_description: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let name = validated_name(new_name.into())?;
        Ok(Self {
            id: TaskId::generate(),
            name,
            status: TaskStatus::NotStarted,
            progress: Some(Progress::ZERO),
            created_at: clock.utc(),
            completed_at: None,
            description: new_description,
            has_queued_before: false,
            ..self.clone()
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of ML work.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the owning project identifier, if recorded.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Returns the owning project display name carried by legacy records.
    #[must_use]
    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    /// Returns the primary dataset name, falling back to the first linked
    /// dataset.
    #[must_use]
    pub fn primary_dataset_name(&self) -> Option<&str> {
        self.dataset_name
            .as_deref()
            .or_else(|| self.linked_datasets.first().map(|dataset| dataset.name.as_str()))
    }

    /// Returns the primary dataset version, falling back to the first linked
    /// dataset.
    #[must_use]
    pub fn primary_dataset_version(&self) -> Option<&str> {
        self.dataset_version
            .as_deref()
            .or_else(|| self.linked_datasets.first().map(|dataset| dataset.version.as_str()))
    }

    /// Returns the linked datasets.
    #[must_use]
    pub fn linked_datasets(&self) -> &[LinkedDataset] {
        &self.linked_datasets
    }

    /// Iterates over every dataset name the task references.
    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.dataset_name
            .as_deref()
            .into_iter()
            .chain(self.linked_datasets.iter().map(|dataset| dataset.name.as_str()))
    }

    /// Returns the model name.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the progress, if set.
    #[must_use]
    pub const fn progress(&self) -> Option<Progress> {
        self.progress
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the author.
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the task was ever pulled back out of the queue.
    #[must_use]
    pub const fn has_queued_before(&self) -> bool {
        self.has_queued_before
    }

    /// Applies descriptive changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] when the patch blanks the
    /// name. The task is unchanged on error.
    pub fn apply_patch(&mut self, patch: TaskPatch) -> Result<(), TaskDomainError> {
        let name = patch.name.map(validated_name).transpose()?;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(model_name) = patch.model_name {
            self.model_name = model_name;
        }
        if let Some((dataset_name, dataset_version)) = patch.dataset {
            self.dataset_name = Some(dataset_name);
            self.dataset_version = Some(dataset_version);
        }
        if let Some(linked) = patch.linked_datasets {
            self.linked_datasets = linked;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = Some(project_id);
        }
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub(crate) fn set_progress(&mut self, progress: Option<Progress>) {
        self.progress = progress;
    }

    pub(crate) fn set_completed_at(&mut self, completed_at: DateTime<Utc>) {
        self.completed_at = Some(completed_at);
    }

    pub(crate) fn mark_queued_before(&mut self) {
        self.has_queued_before = true;
    }
}

impl TryFrom<NewTask> for Task {
    type Error = TaskDomainError;

    fn try_from(record: NewTask) -> Result<Self, Self::Error> {
        Self::from_new(record)
    }
}

fn validated_name(name: String) -> Result<String, TaskDomainError> {
    if name.trim().is_empty() {
        return Err(TaskDomainError::EmptyTaskName);
    }
    Ok(name)
}
