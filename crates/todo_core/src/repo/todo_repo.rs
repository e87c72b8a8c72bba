//! Todo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide row-level CRUD over the `todos` table.
//! - Keep column mapping and label parsing inside the persistence boundary.
//!
//! # Invariants
//! - `list_todos` returns rows in ascending id order (insertion order); the
//!   display ordering is applied by the caller.
//! - `replace_todo` and `delete_todo` report `NotFound` when no row matched.

use crate::model::timestamp::{from_epoch_ms, to_epoch_ms};
use crate::model::todo::{Priority, TodoId, TodoItem, TodoStatus};
use crate::repo::{RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    priority,
    status,
    category,
    created_date,
    due_date,
    last_updated,
    estimated_duration
FROM todos";

/// Column list and values for `INSERT` variants. `?1` is always the id.
const TODO_INSERT_SQL: &str = "(
    id,
    title,
    description,
    priority,
    status,
    category,
    created_date,
    due_date,
    last_updated,
    estimated_duration
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);";

const TODO_UPDATE_SQL: &str = "UPDATE todos
SET
    title = ?2,
    description = ?3,
    priority = ?4,
    status = ?5,
    category = ?6,
    created_date = ?7,
    due_date = ?8,
    last_updated = ?9,
    estimated_duration = ?10
WHERE id = ?1;";

/// Row-level persistence for todo items.
pub trait TodoRepository {
    /// Inserts a new row; fails on an id collision.
    fn insert_todo(&self, todo: &TodoItem) -> RepoResult<()>;
    /// Inserts or fully replaces the row with `todo.id`.
    fn upsert_todo(&self, todo: &TodoItem) -> RepoResult<()>;
    /// Overwrites every column of an existing row.
    fn replace_todo(&self, todo: &TodoItem) -> RepoResult<()>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<TodoItem>>;
    /// All rows in ascending id order.
    fn list_todos(&self) -> RepoResult<Vec<TodoItem>>;
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
    /// Largest stored id, `0` for an empty table.
    fn max_todo_id(&self) -> RepoResult<TodoId>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Validates `todo` and runs `sql` with the shared `?1..?10` bindings.
    fn write_todo(&self, sql: &str, todo: &TodoItem) -> RepoResult<usize> {
        todo.validate()?;

        Ok(self.conn.execute(
            sql,
            params![
                todo.id,
                todo.title.as_str(),
                todo.description.as_str(),
                todo.priority.as_str(),
                todo.status.as_str(),
                todo.category.as_str(),
                to_epoch_ms(todo.created_date),
                todo.due_date.map(to_epoch_ms),
                to_epoch_ms(todo.last_updated),
                todo.estimated_duration.as_str(),
            ],
        )?)
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn insert_todo(&self, todo: &TodoItem) -> RepoResult<()> {
        self.write_todo(&format!("INSERT INTO todos {TODO_INSERT_SQL}"), todo)?;
        Ok(())
    }

    fn upsert_todo(&self, todo: &TodoItem) -> RepoResult<()> {
        self.write_todo(&format!("INSERT OR REPLACE INTO todos {TODO_INSERT_SQL}"), todo)?;
        Ok(())
    }

    fn replace_todo(&self, todo: &TodoItem) -> RepoResult<()> {
        let changed = self.write_todo(TODO_UPDATE_SQL, todo)?;

        if changed == 0 {
            return Err(RepoError::NotFound(todo.id));
        }

        Ok(())
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list_todos(&self) -> RepoResult<Vec<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn max_todo_id(&self) -> RepoResult<TodoId> {
        let max_id = self
            .conn
            .query_row("SELECT MAX(id) FROM todos;", [], |row| {
                row.get::<_, Option<TodoId>>(0)
            })
            .optional()?
            .flatten();
        Ok(max_id.unwrap_or(0))
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<TodoItem> {
    let id: TodoId = row.get("id")?;

    let priority_text: String = row.get("priority")?;
    let priority = priority_text.parse::<Priority>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in todos.priority (id {id})"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = status_text.parse::<TodoStatus>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in todos.status (id {id})"
        ))
    })?;

    let due_date = match row.get::<_, Option<i64>>("due_date")? {
        Some(value) => Some(parse_epoch_column(value, "due_date", id)?),
        None => None,
    };

    let todo = TodoItem {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        priority,
        status,
        category: row.get("category")?,
        created_date: parse_epoch_column(row.get("created_date")?, "created_date", id)?,
        due_date,
        last_updated: parse_epoch_column(row.get("last_updated")?, "last_updated", id)?,
        estimated_duration: row.get("estimated_duration")?,
    };
    todo.validate()
        .map_err(|err| RepoError::InvalidData(format!("todo {id}: {err}")))?;
    Ok(todo)
}

fn parse_epoch_column(value: i64, column: &str, id: TodoId) -> RepoResult<DateTime<Utc>> {
    from_epoch_ms(value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "timestamp `{value}` out of range in todos.{column} (id {id})"
        ))
    })
}
