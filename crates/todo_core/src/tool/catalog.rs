//! Tool names, descriptions and JSON input schemas.

use serde::Serialize;
use serde_json::{json, Value};

pub const LIST_TODOS: &str = "list_todos";
pub const GET_TODO: &str = "get_todo";
pub const CREATE_TODO: &str = "create_todo";
pub const UPDATE_TODO: &str = "update_todo";
pub const DELETE_TODO: &str = "delete_todo";
pub const GET_USER_PROFILE: &str = "get_user_profile";
pub const ANALYZE_TASKS: &str = "analyze_tasks";
pub const OPTIMIZE_SCHEDULE: &str = "optimize_schedule";
pub const BREAK_DOWN_TASK: &str = "break_down_task";

/// One entry of the tool manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn priority_schema() -> Value {
    json!({"type": "string", "enum": ["urgent", "high", "medium", "low"]})
}

fn status_schema() -> Value {
    json!({"type": "string", "enum": ["pending", "in_progress", "completed", "scheduled"]})
}

fn todo_fields_schema() -> serde_json::Map<String, Value> {
    let mut fields = serde_json::Map::new();
    fields.insert("title".into(), json!({"type": "string"}));
    fields.insert("description".into(), json!({"type": "string"}));
    fields.insert("priority".into(), priority_schema());
    fields.insert("status".into(), status_schema());
    fields.insert("category".into(), json!({"type": "string"}));
    fields.insert(
        "due_date".into(),
        json!({"type": "string", "description": "RFC 3339 timestamp or YYYY-MM-DD"}),
    );
    fields.insert("estimated_duration".into(), json!({"type": "string"}));
    fields
}

/// Every tool the dispatcher understands.
pub fn tool_catalog() -> Vec<ToolDescriptor> {
    let create_fields = todo_fields_schema();
    let mut update_fields = todo_fields_schema();
    update_fields.insert("id".into(), json!({"type": "integer"}));
    update_fields.insert("clear_due_date".into(), json!({"type": "boolean"}));

    vec![
        ToolDescriptor {
            name: LIST_TODOS,
            description: "List todos in priority order, optionally filtered",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "status": status_schema(),
                    "priority": priority_schema(),
                    "category": {"type": "string"}
                }
            }),
        },
        ToolDescriptor {
            name: GET_TODO,
            description: "Show one todo by id",
            input_schema: json!({
                "type": "object",
                "properties": {"id": {"type": "integer"}},
                "required": ["id"]
            }),
        },
        ToolDescriptor {
            name: CREATE_TODO,
            description: "Create a new todo",
            input_schema: json!({
                "type": "object",
                "properties": create_fields,
                "required": ["title"]
            }),
        },
        ToolDescriptor {
            name: UPDATE_TODO,
            description: "Update fields of an existing todo",
            input_schema: json!({
                "type": "object",
                "properties": update_fields,
                "required": ["id"]
            }),
        },
        ToolDescriptor {
            name: DELETE_TODO,
            description: "Delete a todo permanently",
            input_schema: json!({
                "type": "object",
                "properties": {"id": {"type": "integer"}},
                "required": ["id"]
            }),
        },
        ToolDescriptor {
            name: GET_USER_PROFILE,
            description: "Show the user profile and work schedule",
            input_schema: json!({"type": "object", "properties": {}}),
        },
        ToolDescriptor {
            name: ANALYZE_TASKS,
            description: "Count tasks by priority, overdue, stale or workload",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "analysis_type": {
                        "type": "string",
                        "enum": ["priority", "overdue", "stale", "workload"]
                    }
                }
            }),
        },
        ToolDescriptor {
            name: OPTIMIZE_SCHEDULE,
            description: "List open urgent/high tasks with scheduling tips",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "time_horizon": {"type": "string"},
                    "work_hours": {"type": "integer", "minimum": 1}
                }
            }),
        },
        ToolDescriptor {
            name: BREAK_DOWN_TASK,
            description: "Suggest subtasks for a todo",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "task_id": {"type": "integer"},
                    "complexity": {"type": "string", "enum": ["simple", "medium", "complex"]}
                },
                "required": ["task_id"]
            }),
        },
    ]
}
