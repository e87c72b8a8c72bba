//! Todo persistence and ordering engine.
//! This crate is the single source of truth for todo invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod repo;
pub mod service;
pub mod tool;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::profile::{UserProfile, WorkSchedule};
pub use model::todo::{NewTodo, Priority, TodoId, TodoItem, TodoStatus, TodoValidationError};
pub use ordering::{ordered, priority_rank, sort_todos};
pub use service::import::{import_file, import_snapshot, ImportError, ImportSummary, Snapshot};
pub use service::todo_store::{
    ErrorKind, StorageError, StoreError, StoreResult, TodoFilter, TodoStore,
};
pub use tool::dispatch::{ToolDispatcher, ToolOutput};
pub use tool::request::{ToolCall, ToolRequest};
pub use tool::ToolError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
