//! Use-case services on top of the repositories.
//!
//! # Responsibility
//! - `TodoStore`: the single owner and mutation point of todo/profile state.
//! - `IdAllocator`: monotonic id issuing, recoverable from storage.
//! - Snapshot import and fixed-template task analysis.

pub mod analysis;
pub mod id_allocator;
pub mod import;
pub mod todo_store;
