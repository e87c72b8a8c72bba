//! Entity store: exclusive owner of todo items and the user profile.
//!
//! # Responsibility
//! - Single mutation point for todos and the profile singleton.
//! - Apply creation defaults and the timestamp policy.
//! - Return listings in display order as independent copies.
//!
//! # Invariants
//! - Every operation runs under one store lock, so operations on the same id
//!   are linearized and listings never observe a half-applied write.
//! - Mutations run in one SQLite transaction; on error nothing is applied.
//! - `created_date` never changes after creation; `last_updated` never moves
//!   backwards.
//! - An id is consumed only when its create committed, and never reissued.
//! - Store operations do not log; errors go back to the caller.

use crate::config::CoreConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::profile::UserProfile;
use crate::model::timestamp::{now_millis, truncate_to_millis};
use crate::model::todo::{NewTodo, Priority, TodoId, TodoItem, TodoStatus, TodoValidationError};
use crate::ordering::ordered;
use crate::repo::id_sequence::record_issued;
use crate::repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
use crate::repo::todo_repo::{SqliteTodoRepository, TodoRepository};
use crate::repo::RepoError;
use crate::service::id_allocator::IdAllocator;
use crate::service::import::ImportSummary;
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub type StoreResult<T> = Result<T, StoreError>;

/// Coarse error taxonomy exposed to outer layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Storage => "storage_error",
        }
    }
}

/// Persistence-medium failures. Never retried by the store.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    InvalidData(String),
    LockPoisoned,
    IdSpaceExhausted,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::LockPoisoned => write!(f, "store lock poisoned by a panicked writer"),
            Self::IdSpaceExhausted => write!(f, "no todo ids left to allocate"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::LockPoisoned | Self::IdSpaceExhausted => None,
        }
    }
}

/// Errors returned by entity store operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(TodoValidationError),
    TodoNotFound(TodoId),
    ProfileNotFound,
    Storage(StorageError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::TodoNotFound(_) | Self::ProfileNotFound => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TodoNotFound(id) => write!(f, "todo with id {id} not found"),
            Self::ProfileNotFound => write!(f, "user profile not found"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::TodoNotFound(_) | Self::ProfileNotFound => None,
        }
    }
}

impl From<TodoValidationError> for StoreError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(StorageError::Db(value))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Db(DbError::Sqlite(value)))
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Db(err) => Self::Storage(StorageError::Db(err)),
            RepoError::NotFound(id) => Self::TodoNotFound(id),
            RepoError::ProfileNotFound => Self::ProfileNotFound,
            RepoError::InvalidData(message) => Self::Storage(StorageError::InvalidData(message)),
        }
    }
}

/// Exact-match listing filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub status: Option<TodoStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
}

impl TodoFilter {
    pub fn matches(&self, todo: &TodoItem) -> bool {
        self.status.map_or(true, |status| todo.status == status)
            && self.priority.map_or(true, |priority| todo.priority == priority)
            && self
                .category
                .as_deref()
                .map_or(true, |category| todo.category == category)
    }
}

struct StoreState {
    conn: Connection,
    ids: IdAllocator,
}

/// SQLite-backed entity store. Share it across threads with `Arc<TodoStore>`.
pub struct TodoStore {
    state: Mutex<StoreState>,
}

impl TodoStore {
    /// Wraps a migrated connection and recovers id allocation from it.
    pub fn open(conn: Connection) -> StoreResult<Self> {
        let ids = IdAllocator::recover(&conn)?;
        Ok(Self {
            state: Mutex::new(StoreState { conn, ids }),
        })
    }

    /// Fresh, empty, private in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(open_db_in_memory()?)
    }

    /// Store backed by a SQLite file, created on first use.
    pub fn open_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open(open_db(path)?)
    }

    /// Opens the store selected by `config.db_path`.
    pub fn from_config(config: &CoreConfig) -> StoreResult<Self> {
        match &config.db_path {
            Some(path) => Self::open_file(path),
            None => Self::open_in_memory(),
        }
    }

    /// Installs an already-parsed profile and returns the store.
    pub fn with_profile(self, profile: &UserProfile) -> StoreResult<Self> {
        self.set_user_profile(profile)?;
        Ok(self)
    }

    /// Id the next successful create will receive.
    pub fn next_id(&self) -> StoreResult<TodoId> {
        Ok(self.lock()?.ids.peek())
    }

    /// Creates a todo from `request`.
    ///
    /// # Contract
    /// - Assigns the next id and sets both timestamps to now.
    /// - Blank priority/status/category become `medium`/`pending`/`personal`.
    /// - Fails with `Validation` for a blank title; no id is consumed then.
    /// - Fails with `IdSpaceExhausted` once `MAX_TODO_ID` has been issued.
    pub fn create_todo(&self, request: NewTodo) -> StoreResult<TodoItem> {
        let mut state = self.lock()?;
        let StoreState { conn, ids } = &mut *state;

        if ids.is_exhausted() {
            return Err(StoreError::Storage(StorageError::IdSpaceExhausted));
        }
        let todo = request.into_item(ids.peek(), now_millis())?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        SqliteTodoRepository::new(&tx).insert_todo(&todo)?;
        record_issued(&tx, todo.id)?;
        tx.commit()?;

        ids.advance();
        Ok(todo)
    }

    pub fn get_todo(&self, id: TodoId) -> StoreResult<TodoItem> {
        let state = self.lock()?;
        SqliteTodoRepository::new(&state.conn)
            .get_todo(id)?
            .ok_or(StoreError::TodoNotFound(id))
    }

    /// Every todo in display order.
    pub fn get_all_todos(&self) -> StoreResult<Vec<TodoItem>> {
        let todos = {
            let state = self.lock()?;
            SqliteTodoRepository::new(&state.conn).list_todos()?
        };
        Ok(ordered(todos))
    }

    /// Todos matching `filter`, in display order.
    pub fn list_todos(&self, filter: &TodoFilter) -> StoreResult<Vec<TodoItem>> {
        let mut todos = self.get_all_todos()?;
        todos.retain(|todo| filter.matches(todo));
        Ok(todos)
    }

    /// Replaces the stored record with `todo` (full replace, not patch).
    ///
    /// # Contract
    /// - Fails with `TodoNotFound` when `todo.id` does not exist.
    /// - Keeps the stored `created_date`; caller-supplied timestamps are ignored.
    /// - `last_updated` becomes now, or stays put if the clock went backwards.
    /// - `due_date` is truncated to milliseconds.
    /// - Returns the record as stored.
    pub fn update_todo(&self, todo: &TodoItem) -> StoreResult<TodoItem> {
        if todo.title.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle.into());
        }

        let mut state = self.lock()?;
        let tx = state
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let repo = SqliteTodoRepository::new(&tx);

        let existing = repo
            .get_todo(todo.id)?
            .ok_or(StoreError::TodoNotFound(todo.id))?;
        let record = TodoItem {
            created_date: existing.created_date,
            due_date: todo.due_date.map(truncate_to_millis),
            last_updated: now_millis().max(existing.last_updated),
            ..todo.clone()
        };
        repo.replace_todo(&record)?;
        tx.commit()?;

        Ok(record)
    }

    /// Permanently removes a todo. Its id is not reused.
    pub fn delete_todo(&self, id: TodoId) -> StoreResult<()> {
        let state = self.lock()?;
        SqliteTodoRepository::new(&state.conn).delete_todo(id)?;
        Ok(())
    }

    pub fn get_user_profile(&self) -> StoreResult<UserProfile> {
        let state = self.lock()?;
        SqliteProfileRepository::new(&state.conn)
            .get_profile()?
            .ok_or(StoreError::ProfileNotFound)
    }

    /// Creates or replaces the profile singleton.
    pub fn set_user_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        let state = self.lock()?;
        SqliteProfileRepository::new(&state.conn).replace_profile(profile)?;
        Ok(())
    }

    /// Writes already-validated imported records in one transaction.
    ///
    /// Todos keep their ids and timestamps; an existing row with the same id
    /// is replaced. The allocator moves past the largest imported id.
    pub fn import_records(
        &self,
        profile: Option<&UserProfile>,
        todos: &[TodoItem],
    ) -> StoreResult<ImportSummary> {
        let mut state = self.lock()?;
        let StoreState { conn, ids } = &mut *state;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Some(profile) = profile {
            SqliteProfileRepository::new(&tx).replace_profile(profile)?;
        }
        let repo = SqliteTodoRepository::new(&tx);
        for todo in todos {
            repo.upsert_todo(todo)?;
        }
        let highest = todos.iter().map(|todo| todo.id).max();
        if let Some(highest) = highest {
            record_issued(&tx, highest)?;
        }
        tx.commit()?;

        if let Some(highest) = highest {
            ids.observe(highest);
        }

        Ok(ImportSummary {
            profile_imported: profile.is_some(),
            todos_imported: todos.len(),
            next_id: ids.peek(),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Storage(StorageError::LockPoisoned))
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, StoreError, TodoFilter, TodoStore};
    use crate::model::todo::{NewTodo, Priority, TodoStatus, TodoValidationError};

    #[test]
    fn error_kinds_follow_taxonomy() {
        assert_eq!(
            StoreError::Validation(TodoValidationError::EmptyTitle).kind(),
            ErrorKind::Validation
        );
        assert_eq!(StoreError::TodoNotFound(3).kind(), ErrorKind::NotFound);
        assert_eq!(StoreError::ProfileNotFound.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn failed_create_does_not_consume_an_id() {
        let store = TodoStore::open_in_memory().unwrap();
        assert!(store.create_todo(NewTodo::new("  ")).is_err());
        assert_eq!(store.next_id().unwrap(), 1);
        assert_eq!(store.create_todo(NewTodo::new("ok")).unwrap().id, 1);
    }

    #[test]
    fn filter_requires_every_supplied_field() {
        let store = TodoStore::open_in_memory().unwrap();
        store
            .create_todo(NewTodo::new("a").with_priority(Priority::High).with_category("work"))
            .unwrap();
        store
            .create_todo(NewTodo::new("b").with_priority(Priority::High))
            .unwrap();
        store
            .create_todo(NewTodo::new("c").with_status(TodoStatus::Completed))
            .unwrap();

        let filter = TodoFilter {
            priority: Some(Priority::High),
            category: Some("work".to_string()),
            ..TodoFilter::default()
        };
        let titles: Vec<String> = store
            .list_todos(&filter)
            .unwrap()
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(titles, vec!["a".to_string()]);
    }
}
