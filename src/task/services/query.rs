//! Filter and sort engine over the task store.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{
    domain::{Priority, Task, TaskId, TaskStatus, TaskType},
    ports::{ProjectDirectory, TaskStore},
};

use super::TaskLifecycleResult;

/// Inclusive creation-time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// A range without bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Builds a range from calendar days in `tz`.
    ///
    /// `start` begins at midnight; `end` includes its whole day up to
    /// 23:59:59.999.
    #[must_use]
    pub fn between_dates<Tz: TimeZone>(
        tz: &Tz,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        Self {
            start: start
                .and_then(|day| day.and_hms_milli_opt(0, 0, 0, 0))
                .map(|instant| resolve_local(tz, &instant, true)),
            end: end
                .and_then(|day| day.and_hms_milli_opt(23, 59, 59, 999))
                .map(|instant| resolve_local(tz, &instant, false)),
        }
    }

    /// Builds a range from calendar days in the host's local time zone.
    #[must_use]
    pub fn local_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self::between_dates(&Local, start, end)
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Returns the inclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Returns `true` when `instant` lies within the range.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| instant >= start) && self.end.is_none_or(|end| instant <= end)
    }
}

/// Maps a wall-clock instant to UTC, taking the widest reading across DST
/// folds and falling back to UTC inside DST gaps.
fn resolve_local<Tz: TimeZone>(tz: &Tz, instant: &NaiveDateTime, earliest: bool) -> DateTime<Utc> {
    let mapped = tz.from_local_datetime(instant);
    let resolved = if earliest {
        mapped.earliest()
    } else {
        mapped.latest()
    };
    resolved.map_or_else(
        || Utc.from_utc_datetime(instant),
        |local| local.with_timezone(&Utc),
    )
}

/// Filter criteria, combined with logical AND.
///
/// `None` and empty selections impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring matched against name, id, dataset names
    /// and model name.
    pub search_query: String,
    /// Exact task type.
    pub task_type: Option<TaskType>,
    /// Exact status.
    pub status: Option<TaskStatus>,
    /// Dataset names; a task matches when any of its datasets is selected.
    pub dataset_names: Vec<String>,
    /// Model names; a task matches when its model is selected.
    pub model_names: Vec<String>,
    /// Project identifier.
    pub project_id: Option<String>,
    /// Exact priority.
    pub priority: Option<Priority>,
    /// Creation-time window.
    pub date_range: DateRange,
}

impl TaskFilter {
    /// Sets the search query.
    #[must_use]
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Sets the status filter.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the task type filter.
    #[must_use]
    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    /// Sets the priority filter.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the dataset selection.
    #[must_use]
    pub fn with_dataset_names(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dataset_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the model selection.
    #[must_use]
    pub fn with_model_names(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.model_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the project filter.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the creation-time window.
    #[must_use]
    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }
}

/// Sortable task attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Completion time; tasks without one sort earliest.
    CompletedAt,
    /// Lifecycle status rank.
    Status,
    /// Priority rank.
    Priority,
    /// Task name, case-insensitive.
    TaskName,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Single-key sort specification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSort {
    /// Attribute to sort by.
    pub field: SortField,
    /// Direction.
    pub order: SortOrder,
}

impl TaskSort {
    /// Creates a sort specification.
    #[must_use]
    pub const fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// Filters and sorts `tasks`.
///
/// The sort is stable: tasks with equal keys keep their input order in both
/// directions.
#[must_use]
pub fn apply_query(
    tasks: Vec<Task>,
    filter: &TaskFilter,
    sort: TaskSort,
    projects: &impl ProjectDirectory,
) -> Vec<Task> {
    let criteria = Criteria::new(filter, projects);
    let mut matching: Vec<Task> = tasks
        .into_iter()
        .filter(|task| criteria.matches(task))
        .collect();
    matching.sort_by(|left, right| match sort.order {
        SortOrder::Asc => compare_by(sort.field, left, right),
        SortOrder::Desc => compare_by(sort.field, right, left),
    });
    matching
}

fn compare_by(field: SortField, left: &Task, right: &Task) -> Ordering {
    match field {
        SortField::CreatedAt => left.created_at().cmp(&right.created_at()),
        SortField::CompletedAt => left.completed_at().cmp(&right.completed_at()),
        SortField::Status => left.status().rank().cmp(&right.status().rank()),
        SortField::Priority => left.priority().rank().cmp(&right.priority().rank()),
        SortField::TaskName => left
            .name()
            .to_lowercase()
            .cmp(&right.name().to_lowercase())
            .then_with(|| left.name().cmp(right.name())),
    }
}

/// Filter with its text criteria normalised once.
struct Criteria<'a> {
    filter: &'a TaskFilter,
    search: Option<String>,
    datasets: BTreeSet<String>,
    models: BTreeSet<String>,
    project_name: Option<String>,
}

impl<'a> Criteria<'a> {
    fn new(filter: &'a TaskFilter, projects: &impl ProjectDirectory) -> Self {
        let search = Some(filter.search_query.trim().to_lowercase()).filter(|q| !q.is_empty());
        Self {
            filter,
            search,
            datasets: lowercase_set(&filter.dataset_names),
            models: lowercase_set(&filter.model_names),
            project_name: filter
                .project_id
                .as_deref()
                .and_then(|id| projects.display_name(id)),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.filter.task_type.is_none_or(|kind| task.task_type() == kind)
            && self.filter.status.is_none_or(|status| task.status() == status)
            && self.matches_datasets(task)
            && self.matches_models(task)
            && self.matches_project(task)
            && self.filter.priority.is_none_or(|priority| task.priority() == priority)
            && self.filter.date_range.contains(task.created_at())
    }

    fn matches_search(&self, task: &Task) -> bool {
        let Some(query) = self.search.as_deref() else {
            return true;
        };
        let contains = |text: &str| text.to_lowercase().contains(query);
        contains(task.name())
            || contains(task.id().as_str())
            || task.dataset_names().any(contains)
            || contains(task.model_name())
    }

    fn matches_datasets(&self, task: &Task) -> bool {
        self.datasets.is_empty()
            || task
                .dataset_names()
                .any(|name| self.datasets.contains(&name.to_lowercase()))
    }

    fn matches_models(&self, task: &Task) -> bool {
        self.models.is_empty() || self.models.contains(&task.model_name().to_lowercase())
    }

    fn matches_project(&self, task: &Task) -> bool {
        let Some(project_id) = self.filter.project_id.as_deref() else {
            return true;
        };
        match task.project_id() {
            Some(id) => id == project_id,
            None => self
                .project_name
                .as_deref()
                .is_some_and(|name| task.project_name() == Some(name)),
        }
    }
}

fn lowercase_set(values: &[String]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_lowercase()).collect()
}

/// Query service reading fresh snapshots from the task store.
pub struct TaskQueryService<S, P>
where
    S: TaskStore,
    P: ProjectDirectory,
{
    store: Arc<S>,
    projects: Arc<P>,
}

impl<S, P> TaskQueryService<S, P>
where
    S: TaskStore,
    P: ProjectDirectory,
{
    /// Creates a query service.
    #[must_use]
    pub const fn new(store: Arc<S>, projects: Arc<P>) -> Self {
        Self { store, projects }
    }

    /// Lists the tasks matching `filter`, ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns a store error when the snapshot cannot be read.
    pub async fn list_filtered(
        &self,
        filter: &TaskFilter,
        sort: TaskSort,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let snapshot = self.store.list().await?;
        Ok(apply_query(snapshot, filter, sort, &*self.projects))
    }
}

/// Set of selected tasks, restricted to what the current result shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSelection {
    selected: BTreeSet<TaskId>,
}

impl TaskSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects or deselects one task.
    pub fn toggle(&mut self, task_id: &TaskId) {
        if !self.selected.remove(task_id) {
            self.selected.insert(task_id.clone());
        }
    }

    /// Replaces the selection with every task in `visible`.
    pub fn select_all(&mut self, visible: &[Task]) {
        self.selected = visible.iter().map(|task| task.id().clone()).collect();
    }

    /// Drops selected tasks that are no longer visible.
    pub fn retain_visible(&mut self, visible: &[Task]) {
        let visible_ids: BTreeSet<&TaskId> = visible.iter().map(Task::id).collect();
        self.selected.retain(|id| visible_ids.contains(id));
    }

    /// Returns `true` when every visible task is selected.
    #[must_use]
    pub fn is_all_selected(&self, visible: &[Task]) -> bool {
        !visible.is_empty() && visible.iter().all(|task| self.selected.contains(task.id()))
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Returns `true` when `task_id` is selected.
    #[must_use]
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.selected.contains(task_id)
    }

    /// Returns the number of selected tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterates over the selected identifiers.
    pub fn iter(&self) -> impl Iterator<Item = &TaskId> {
        self.selected.iter()
    }
}
