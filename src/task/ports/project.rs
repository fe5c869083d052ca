//! Project directory port used to resolve project display names.

/// Read-only lookup of project display names by identifier.
///
/// Legacy task records carry only a project name, so project filters fall
/// back to comparing the resolved name.
pub trait ProjectDirectory: Send + Sync {
    /// Returns the display name for a project identifier.
    fn display_name(&self, project_id: &str) -> Option<String>;
}
