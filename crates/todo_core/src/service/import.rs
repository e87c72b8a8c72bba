//! Snapshot import from the external JSON export.
//!
//! The document shape is
//! `{"user_profile": {...}, "todos": [{"id": 1, "title": "...", ...}]}` with
//! snake_case fields and RFC 3339 timestamps.
//!
//! # Invariants
//! - Every todo is validated before the first write; a bad record aborts the
//!   whole import.
//! - The profile is replaced only when the snapshot names a user.
//! - Blank labels get the same defaults as `create_todo`.

use crate::model::profile::UserProfile;
use crate::model::timestamp::{now_millis, truncate_to_millis};
use crate::model::todo::{
    parse_due_date, parse_priority_label, parse_status_label, TodoId, TodoItem,
    TodoValidationError, DEFAULT_CATEGORY,
};
use crate::service::todo_store::{StoreError, TodoStore};
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Parsed export document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub user_profile: UserProfile,
    #[serde(default)]
    pub todos: Vec<SnapshotTodo>,
}

/// One exported todo. Labels and dates are raw text until validated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapshotTodo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_duration: String,
}

impl SnapshotTodo {
    /// Validates and converts to a stored record.
    ///
    /// Missing `created_date` falls back to the earlier of `last_updated`
    /// and `imported_at`; missing `last_updated` falls back to `created_date`.
    pub fn into_item(self, imported_at: DateTime<Utc>) -> Result<TodoItem, TodoValidationError> {
        let last_updated = self.last_updated.map(truncate_to_millis);
        let created_date = self
            .created_date
            .map(truncate_to_millis)
            .or_else(|| last_updated.map(|updated| updated.min(imported_at)))
            .unwrap_or(imported_at);
        let last_updated = last_updated.unwrap_or(created_date);
        let category = if self.category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            self.category
        };

        let item = TodoItem {
            id: self.id,
            title: self.title,
            description: self.description,
            priority: parse_priority_label(&self.priority)?.unwrap_or_default(),
            status: parse_status_label(&self.status)?.unwrap_or_default(),
            category,
            created_date,
            due_date: parse_due_date(self.due_date.as_deref().unwrap_or_default())?,
            last_updated,
            estimated_duration: self.estimated_duration,
        };
        item.validate()?;
        Ok(item)
    }
}

/// Outcome of a committed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub profile_imported: bool,
    pub todos_imported: usize,
    pub next_id: TodoId,
}

/// Import failures.
#[derive(Debug)]
pub enum ImportError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    /// Record at `index` (0-based, id `id`) failed validation.
    InvalidTodo {
        index: usize,
        id: TodoId,
        source: TodoValidationError,
    },
    Store(StoreError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read snapshot `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse snapshot: {err}"),
            Self::InvalidTodo { index, id, source } => {
                write!(f, "snapshot todo #{index} (id {id}) is invalid: {source}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidTodo { source, .. } => Some(source),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Parses snapshot JSON text.
pub fn parse_snapshot(text: &str) -> Result<Snapshot, ImportError> {
    Ok(serde_json::from_str(text)?)
}

/// Reads and parses a snapshot file.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Snapshot, ImportError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&text)
}

/// Validates `snapshot` and writes it into `store` atomically.
pub fn import_snapshot(store: &TodoStore, snapshot: Snapshot) -> Result<ImportSummary, ImportError> {
    let started_at = Instant::now();
    info!(
        "event=snapshot_import module=service status=start todos={}",
        snapshot.todos.len()
    );

    let result = validate_and_write(store, snapshot);
    match &result {
        Ok(summary) => info!(
            "event=snapshot_import module=service status=ok duration_ms={} todos={} profile={} next_id={}",
            started_at.elapsed().as_millis(),
            summary.todos_imported,
            summary.profile_imported,
            summary.next_id
        ),
        Err(err) => error!(
            "event=snapshot_import module=service status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

/// `load_snapshot` followed by `import_snapshot`.
pub fn import_file(store: &TodoStore, path: impl AsRef<Path>) -> Result<ImportSummary, ImportError> {
    let snapshot = load_snapshot(path)?;
    import_snapshot(store, snapshot)
}

fn validate_and_write(store: &TodoStore, snapshot: Snapshot) -> Result<ImportSummary, ImportError> {
    let imported_at = now_millis();
    let mut todos = Vec::with_capacity(snapshot.todos.len());
    for (index, raw) in snapshot.todos.into_iter().enumerate() {
        let id = raw.id;
        let todo = raw
            .into_item(imported_at)
            .map_err(|source| ImportError::InvalidTodo { index, id, source })?;
        todos.push(todo);
    }

    let profile = if snapshot.user_profile.name.trim().is_empty() {
        None
    } else {
        Some(&snapshot.user_profile)
    };

    Ok(store.import_records(profile, &todos)?)
}
