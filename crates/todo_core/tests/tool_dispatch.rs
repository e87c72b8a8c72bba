use serde_json::{json, Value};
use todo_core::tool::catalog::tool_catalog;
use todo_core::{ToolCall, ToolDispatcher, ToolOutput, TodoStore, UserProfile};

fn call(store: &TodoStore, name: &str, arguments: Value) -> ToolOutput {
    ToolDispatcher::new(store).call(&ToolCall::new(name, arguments))
}

#[test]
fn create_then_list_uses_canned_messages() {
    let store = TodoStore::open_in_memory().unwrap();

    let created = call(
        &store,
        "create_todo",
        json!({"title": "Ship release", "priority": "urgent", "category": "work"}),
    );
    assert!(!created.is_error);
    assert_eq!(created.text(), "Created todo: Ship release (ID: 1)");
    assert_eq!(created.data.as_ref().unwrap()["priority"], "urgent");

    call(&store, "create_todo", json!({"title": "Water plants"}));

    let listed = call(&store, "list_todos", json!({"category": "work"}));
    assert_eq!(listed.text(), "Found 1 todos matching the criteria");
    assert_eq!(listed.data.unwrap()[0]["title"], "Ship release");
}

#[test]
fn create_ignores_caller_supplied_id() {
    let store = TodoStore::open_in_memory().unwrap();

    let created = call(&store, "create_todo", json!({"id": 42, "title": "x"}));
    assert_eq!(created.data.unwrap()["id"], 1);
}

#[test]
fn partial_update_changes_only_supplied_fields() {
    let store = TodoStore::open_in_memory().unwrap();
    call(
        &store,
        "create_todo",
        json!({"title": "Plan trip", "description": "flights", "due_date": "2030-05-01"}),
    );

    let updated = call(
        &store,
        "update_todo",
        json!({"id": 1, "status": "completed", "clear_due_date": true}),
    );
    assert!(!updated.is_error, "{}", updated.text());
    assert_eq!(updated.text(), "Updated todo: Plan trip (ID: 1)");

    let todo = store.get_todo(1).unwrap();
    assert_eq!(todo.description, "flights");
    assert_eq!(todo.status.as_str(), "completed");
    assert_eq!(todo.due_date, None);
}

#[test]
fn delete_reports_title_and_missing_ids_fail() {
    let store = TodoStore::open_in_memory().unwrap();
    call(&store, "create_todo", json!({"title": "Old task"}));

    let deleted = call(&store, "delete_todo", json!({"id": 1}));
    assert_eq!(deleted.text(), "Deleted todo: Old task (ID: 1)");

    let again = call(&store, "delete_todo", json!({"id": 1}));
    assert!(again.is_error);
    assert_eq!(again.data.unwrap()["error_kind"], "not_found");
}

#[test]
fn validation_failures_are_reported_as_validation_errors() {
    let store = TodoStore::open_in_memory().unwrap();

    for (name, arguments) in [
        ("create_todo", json!({"title": "   "})),
        ("create_todo", json!({"title": "x", "status": "someday"})),
        ("create_todo", json!({"title": "x", "due_date": "next tuesday"})),
        ("get_todo", json!({"id": "one"})),
        ("analyze_tasks", json!({"analysis_type": "vibes"})),
        ("no_such_tool", json!({})),
    ] {
        let output = call(&store, name, arguments);
        assert!(output.is_error, "{name} should fail");
        assert_eq!(output.data.unwrap()["error_kind"], "validation_error");
    }

    assert!(store.get_all_todos().unwrap().is_empty());
}

#[test]
fn profile_tool_reads_singleton() {
    let store = TodoStore::open_in_memory().unwrap();
    assert!(call(&store, "get_user_profile", json!({})).is_error);

    store
        .set_user_profile(&UserProfile::new("Robin", "UTC"))
        .unwrap();
    let output = call(&store, "get_user_profile", json!({}));
    assert_eq!(output.data.unwrap()["name"], "Robin");
}

#[test]
fn analysis_tools_produce_reports() {
    let store = TodoStore::open_in_memory().unwrap();
    call(&store, "create_todo", json!({"title": "a", "priority": "urgent"}));
    call(&store, "create_todo", json!({"title": "b", "priority": "low"}));

    let priority = call(&store, "analyze_tasks", json!({}));
    assert_eq!(
        priority.text(),
        "Priority Analysis: Urgent: 1, High: 0, Medium: 0, Low: 1"
    );

    let schedule = call(&store, "optimize_schedule", json!({"work_hours": 6}));
    assert!(schedule
        .text()
        .starts_with("Schedule Optimization for today (6 work hours):"));
    assert_eq!(schedule.data.unwrap()["focus_task_ids"], json!([1]));

    let breakdown = call(
        &store,
        "break_down_task",
        json!({"task_id": 2, "complexity": "simple"}),
    );
    assert!(breakdown.text().starts_with("Task Breakdown for: b"));
    assert_eq!(breakdown.data.unwrap()["subtasks"].as_array().unwrap().len(), 3);
}

#[test]
fn catalog_serializes_input_schemas() {
    let catalog = serde_json::to_value(tool_catalog()).unwrap();
    let names: Vec<&str> = catalog
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();

    assert!(names.contains(&"create_todo"));
    assert!(names.contains(&"break_down_task"));
    assert!(catalog[0]["inputSchema"].is_object());
}
