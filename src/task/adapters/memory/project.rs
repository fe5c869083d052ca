//! Fixed project directory backed by a map.

use std::collections::HashMap;

use crate::task::ports::ProjectDirectory;

/// Project directory with a fixed set of `id -> display name` entries.
#[derive(Debug, Clone, Default)]
pub struct StaticProjectDirectory {
    names: HashMap<String, String>,
}

impl StaticProjectDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project entry.
    #[must_use]
    pub fn with_project(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(id.into(), name.into());
        self
    }
}

impl ProjectDirectory for StaticProjectDirectory {
    fn display_name(&self, project_id: &str) -> Option<String> {
        self.names.get(project_id).cloned()
    }
}
