//! In-memory adapter implementations.
//!
//! These adapters back a single dashboard session and the test suites; they
//! keep no state beyond the process.

mod audit;
mod project;
mod store;

pub use audit::InMemoryAuditLog;
pub use project::StaticProjectDirectory;
pub use store::InMemoryTaskStore;
