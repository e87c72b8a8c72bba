//! Repository layer: every SQL statement of the store lives here.
//!
//! # Responsibility
//! - Map `todos`, `user_profile` and `id_allocator` rows to model types.
//! - Return semantic errors (`NotFound`, `ProfileNotFound`) next to
//!   transport errors.
//!
//! # Invariants
//! - Write paths validate records before touching SQL.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repositories borrow a connection; callers decide transaction scope
//!   (a `Transaction` derefs to `Connection`).

use crate::db::DbError;
use crate::model::todo::{TodoId, TodoValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod id_sequence;
pub mod profile_repo;
pub mod todo_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo/profile persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    ProfileNotFound,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::ProfileNotFound => write!(f, "user profile not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::ProfileNotFound | Self::InvalidData(_) => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
