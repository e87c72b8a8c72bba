use chrono::{TimeZone, Timelike, Utc};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;
use todo_core::{
    ErrorKind, NewTodo, Priority, StoreError, TodoStatus, TodoStore, TodoValidationError,
};

#[test]
fn create_applies_defaults_and_sequential_ids() {
    let store = TodoStore::open_in_memory().unwrap();

    let first = store.create_todo(NewTodo::new("write report")).unwrap();
    let second = store.create_todo(NewTodo::new("call bank")).unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.priority, Priority::Medium);
    assert_eq!(first.status, TodoStatus::Pending);
    assert_eq!(first.category, "personal");
    assert_eq!(first.due_date, None);
    assert_eq!(first.created_date, first.last_updated);
}

#[test]
fn created_todo_round_trips_through_get() {
    let store = TodoStore::open_in_memory().unwrap();
    let due = Utc.with_ymd_and_hms(2030, 1, 15, 9, 30, 0).unwrap();

    let created = store
        .create_todo(
            NewTodo::new("file taxes")
                .with_description("federal and state")
                .with_priority(Priority::Urgent)
                .with_status(TodoStatus::InProgress)
                .with_category("finance")
                .with_due_date(due)
                .with_estimated_duration("3 hours"),
        )
        .unwrap();

    let loaded = store.get_todo(created.id).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.due_date, Some(due));
    assert_eq!(loaded.estimated_duration, "3 hours");
}

#[test]
fn sub_millisecond_due_dates_round_trip_through_create_and_update() {
    let store = TodoStore::open_in_memory().unwrap();
    let precise = Utc
        .with_ymd_and_hms(2030, 1, 1, 0, 0, 0)
        .unwrap()
        .with_nanosecond(123_456_789)
        .unwrap();

    let created = store
        .create_todo(NewTodo::new("precise").with_due_date(precise))
        .unwrap();
    assert_eq!(created.due_date.unwrap().nanosecond(), 123_000_000);
    assert_eq!(store.get_todo(created.id).unwrap(), created);

    let mut changed = created.clone();
    changed.due_date = Some(precise.with_nanosecond(987_654_321).unwrap());
    let updated = store.update_todo(&changed).unwrap();
    assert_eq!(updated.due_date.unwrap().nanosecond(), 987_000_000);
    assert_eq!(store.get_todo(created.id).unwrap(), updated);
}

#[test]
fn update_keeps_created_date_and_advances_last_updated() {
    let store = TodoStore::open_in_memory().unwrap();
    let created = store.create_todo(NewTodo::new("draft")).unwrap();

    thread::sleep(Duration::from_millis(5));

    let mut changed = created.clone();
    changed.title = "final".to_string();
    changed.status = TodoStatus::Completed;
    changed.created_date = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();

    let updated = store.update_todo(&changed).unwrap();
    assert_eq!(updated.created_date, created.created_date);
    assert!(updated.last_updated > created.last_updated);

    let loaded = store.get_todo(created.id).unwrap();
    assert_eq!(loaded, updated);
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.status, TodoStatus::Completed);
}

#[test]
fn missing_ids_are_not_found_and_leave_store_unchanged() {
    let store = TodoStore::open_in_memory().unwrap();
    let existing = store.create_todo(NewTodo::new("keep me")).unwrap();

    let get_err = store.get_todo(999).unwrap_err();
    assert!(matches!(get_err, StoreError::TodoNotFound(999)));
    assert_eq!(get_err.kind(), ErrorKind::NotFound);

    let mut ghost = existing.clone();
    ghost.id = 999;
    assert!(matches!(
        store.update_todo(&ghost),
        Err(StoreError::TodoNotFound(999))
    ));
    assert!(matches!(
        store.delete_todo(999),
        Err(StoreError::TodoNotFound(999))
    ));

    assert_eq!(store.get_all_todos().unwrap(), vec![existing]);
}

#[test]
fn delete_removes_record_and_ids_are_never_reused() {
    let store = TodoStore::open_in_memory().unwrap();
    let mut seen = HashSet::new();

    for round in 0..5 {
        let todo = store.create_todo(NewTodo::new(format!("task {round}"))).unwrap();
        assert!(seen.insert(todo.id), "id {} issued twice", todo.id);
        store.delete_todo(todo.id).unwrap();
        assert!(matches!(
            store.get_todo(todo.id),
            Err(StoreError::TodoNotFound(_))
        ));
    }

    assert!(store.get_all_todos().unwrap().is_empty());
    assert_eq!(store.create_todo(NewTodo::new("next")).unwrap().id, 6);
}

#[test]
fn blank_titles_are_rejected_on_create_and_update() {
    let store = TodoStore::open_in_memory().unwrap();

    let err = store.create_todo(NewTodo::new(" \t ")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(TodoValidationError::EmptyTitle)
    ));
    assert_eq!(err.kind(), ErrorKind::Validation);

    let todo = store.create_todo(NewTodo::new("real")).unwrap();
    let mut blank = todo.clone();
    blank.title = String::new();
    assert!(matches!(
        store.update_todo(&blank),
        Err(StoreError::Validation(TodoValidationError::EmptyTitle))
    ));
    assert_eq!(store.get_todo(todo.id).unwrap().title, "real");
}

#[test]
fn listings_are_independent_copies() {
    let store = TodoStore::open_in_memory().unwrap();
    store.create_todo(NewTodo::new("original")).unwrap();

    let mut listing = store.get_all_todos().unwrap();
    listing[0].title = "mutated locally".to_string();

    assert_eq!(store.get_all_todos().unwrap()[0].title, "original");
}
