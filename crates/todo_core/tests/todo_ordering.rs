use chrono::{DateTime, TimeZone, Utc};
use todo_core::{NewTodo, Priority, TodoStatus, TodoStore};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, d, 12, 0, 0).unwrap()
}

fn titles(store: &TodoStore) -> Vec<String> {
    store
        .get_all_todos()
        .unwrap()
        .into_iter()
        .map(|todo| todo.title)
        .collect()
}

#[test]
fn priority_ranks_then_due_dates_order_listing() {
    let store = TodoStore::open_in_memory().unwrap();
    store
        .create_todo(NewTodo::new("A").with_priority(Priority::Low))
        .unwrap();
    store
        .create_todo(
            NewTodo::new("B")
                .with_priority(Priority::High)
                .with_due_date(day(10)),
        )
        .unwrap();
    store
        .create_todo(
            NewTodo::new("C")
                .with_priority(Priority::High)
                .with_due_date(day(12)),
        )
        .unwrap();

    assert_eq!(titles(&store), vec!["B", "C", "A"]);
}

#[test]
fn undated_item_keeps_its_place_among_equal_priority() {
    let store = TodoStore::open_in_memory().unwrap();
    store
        .create_todo(NewTodo::new("D").with_priority(Priority::High))
        .unwrap();
    store
        .create_todo(
            NewTodo::new("E")
                .with_priority(Priority::High)
                .with_due_date(day(1)),
        )
        .unwrap();

    assert_eq!(titles(&store), vec!["D", "E"]);
}

#[test]
fn earlier_due_date_moves_ahead_within_priority() {
    let store = TodoStore::open_in_memory().unwrap();
    store
        .create_todo(
            NewTodo::new("late")
                .with_priority(Priority::Urgent)
                .with_due_date(day(20)),
        )
        .unwrap();
    store
        .create_todo(
            NewTodo::new("soon")
                .with_priority(Priority::Urgent)
                .with_due_date(day(2)),
        )
        .unwrap();
    store
        .create_todo(NewTodo::new("whenever").with_priority(Priority::Medium))
        .unwrap();

    assert_eq!(titles(&store), vec!["soon", "late", "whenever"]);
}

#[test]
fn update_of_priority_moves_item_in_listing() {
    let store = TodoStore::open_in_memory().unwrap();
    store.create_todo(NewTodo::new("first")).unwrap();
    let second = store.create_todo(NewTodo::new("second")).unwrap();

    let mut promoted = second.clone();
    promoted.priority = Priority::Urgent;
    promoted.status = TodoStatus::InProgress;
    store.update_todo(&promoted).unwrap();

    assert_eq!(titles(&store), vec!["second", "first"]);
}
