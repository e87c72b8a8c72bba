//! Canonical domain model for todo items and the user profile.
//!
//! # Responsibility
//! - Own the one `TodoItem` shape every layer depends on.
//! - Define creation requests and the default-value policy.
//!
//! # Invariants
//! - Priority and status are closed enumerations; unknown labels are
//!   validation errors, never stored.
//! - All timestamps carry millisecond precision.

pub mod profile;
pub mod timestamp;
pub mod todo;
