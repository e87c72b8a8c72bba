//! Persisted high-water mark for todo id allocation.
//!
//! The mark records the largest id ever issued, so an id freed by a delete is
//! not handed out again after a restart.

use crate::model::todo::TodoId;
use crate::repo::RepoResult;
use rusqlite::{Connection, OptionalExtension};

const TODO_SCOPE: &str = "todos";

/// Reads the highest id ever issued, `0` when nothing was recorded.
pub fn load_high_water(conn: &Connection) -> RepoResult<TodoId> {
    let value = conn
        .query_row(
            "SELECT high_water FROM id_allocator WHERE scope = ?1;",
            [TODO_SCOPE],
            |row| row.get::<_, TodoId>(0),
        )
        .optional()?;
    Ok(value.unwrap_or(0))
}

/// Raises the high-water mark to `issued` (never lowers it).
pub fn record_issued(conn: &Connection, issued: TodoId) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO id_allocator (scope, high_water) VALUES (?1, ?2)
         ON CONFLICT(scope) DO UPDATE
         SET high_water = MAX(high_water, excluded.high_water);",
        rusqlite::params![TODO_SCOPE, issued],
    )?;
    Ok(())
}
