//! Display ordering for todo listings.
//!
//! # Invariants
//! - Primary key: priority rank (`urgent` < `high` < `medium` < `low`).
//! - Secondary key: earlier due date first, applied only when BOTH items
//!   carry a due date. An undated item is never moved across a dated one of
//!   the same rank, so the due-date key is a partial tie-break.
//! - Items equal under both keys keep their input order.
//!
//! The partial tie-break is not a strict weak order, which std's comparison
//! sorts require. Ranks are therefore sorted with a stable sort, and each
//! equal-rank run is then ordered with an insertion pass that only swaps
//! neighbours that are both dated and out of order.

use crate::model::todo::TodoItem;

/// Maps a priority label to its sort rank.
///
/// Unknown labels map to `0`, which sorts ahead of `urgent`.
pub fn priority_rank(label: &str) -> u8 {
    match label {
        "urgent" => 1,
        "high" => 2,
        "medium" => 3,
        "low" => 4,
        _ => 0,
    }
}

/// Whether `left` must move behind `right` under the due-date tie-break.
fn due_later(left: &TodoItem, right: &TodoItem) -> bool {
    match (left.due_date, right.due_date) {
        (Some(left_due), Some(right_due)) => left_due > right_due,
        _ => false,
    }
}

/// Sorts `items` in place into display order.
pub fn sort_todos(items: &mut [TodoItem]) {
    items.sort_by_key(|item| item.priority.rank());

    let mut run_start = 0;
    while run_start < items.len() {
        let rank = items[run_start].priority.rank();
        let run_end = items[run_start..]
            .iter()
            .position(|item| item.priority.rank() != rank)
            .map_or(items.len(), |offset| run_start + offset);
        order_by_due_date(&mut items[run_start..run_end]);
        run_start = run_end;
    }
}

/// Returns `items` in display order.
pub fn ordered(mut items: Vec<TodoItem>) -> Vec<TodoItem> {
    sort_todos(&mut items);
    items
}

fn order_by_due_date(run: &mut [TodoItem]) {
    for current in 1..run.len() {
        let mut position = current;
        while position > 0 && due_later(&run[position - 1], &run[position]) {
            run.swap(position - 1, position);
            position -= 1;
        }
    }
}
