//! Monotonic todo id allocation.
//!
//! # Invariants
//! - Issued ids are positive and strictly increasing for one allocator.
//! - Recovery starts after the larger of the stored maximum id and the
//!   persisted high-water mark, so ids are never reissued.

use crate::model::todo::{TodoId, MAX_TODO_ID};
use crate::repo::id_sequence::load_high_water;
use crate::repo::todo_repo::{SqliteTodoRepository, TodoRepository};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: TodoId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    /// Allocator whose first id is `highest_issued + 1`.
    ///
    /// Returns `None` when `highest_issued + 1` does not fit in a `TodoId`.
    pub fn starting_after(highest_issued: TodoId) -> Option<Self> {
        let next = highest_issued.max(0).checked_add(1)?;
        Some(Self { next })
    }

    /// True once every storable id has been issued.
    pub fn is_exhausted(&self) -> bool {
        self.next > MAX_TODO_ID
    }

    /// Rebuilds allocator state from persisted rows and bookkeeping.
    pub fn recover(conn: &Connection) -> RepoResult<Self> {
        let max_id = SqliteTodoRepository::new(conn).max_todo_id()?;
        let high_water = load_high_water(conn)?;
        let highest = max_id.max(high_water);
        Self::starting_after(highest).ok_or_else(|| {
            RepoError::InvalidData(format!("stored todo id {highest} is out of range"))
        })
    }

    /// The id the next successful create will receive.
    pub fn peek(&self) -> TodoId {
        self.next
    }

    /// Consumes the current id. Call only after the create committed.
    ///
    /// Saturates at `TodoId::MAX`; see `is_exhausted`.
    pub fn advance(&mut self) -> TodoId {
        let issued = self.next;
        self.next = self.next.saturating_add(1);
        issued
    }

    /// Moves the counter past `issued` if it is behind.
    pub fn observe(&mut self, issued: TodoId) {
        if issued >= self.next {
            self.next = issued.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IdAllocator;
    use crate::model::todo::{TodoId, MAX_TODO_ID};

    #[test]
    fn empty_store_starts_at_one() {
        assert_eq!(IdAllocator::default().peek(), 1);
    }

    #[test]
    fn advance_consumes_exactly_one_id() {
        let mut ids = IdAllocator::starting_after(7).unwrap();
        assert_eq!(ids.peek(), 8);
        assert_eq!(ids.advance(), 8);
        assert_eq!(ids.peek(), 9);
    }

    #[test]
    fn observe_never_moves_backwards() {
        let mut ids = IdAllocator::starting_after(10).unwrap();
        ids.observe(3);
        assert_eq!(ids.peek(), 11);
        ids.observe(20);
        assert_eq!(ids.peek(), 21);
    }

    #[test]
    fn allocator_never_overflows_at_the_top_of_the_id_space() {
        assert_eq!(IdAllocator::starting_after(TodoId::MAX), None);
        assert!(IdAllocator::starting_after(MAX_TODO_ID).unwrap().is_exhausted());

        let mut ids = IdAllocator::starting_after(MAX_TODO_ID - 1).unwrap();
        assert!(!ids.is_exhausted());
        assert_eq!(ids.advance(), MAX_TODO_ID);
        assert!(ids.is_exhausted());
        ids.advance();
        ids.observe(TodoId::MAX);
        assert_eq!(ids.peek(), TodoId::MAX);
    }
}
