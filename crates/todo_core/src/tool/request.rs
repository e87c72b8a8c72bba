//! Typed tool requests parsed from untyped call envelopes.

use crate::model::todo::{
    deserialize_optional_due_date, deserialize_optional_label, NewTodo, Priority, TodoId,
    TodoItem, TodoStatus,
};
use crate::service::analysis::{AnalysisKind, Complexity, ScheduleRequest, DEFAULT_TIME_HORIZON};
use crate::service::todo_store::TodoFilter;
use crate::tool::catalog::{
    ANALYZE_TASKS, BREAK_DOWN_TASK, CREATE_TODO, DELETE_TODO, GET_TODO, GET_USER_PROFILE,
    LIST_TODOS, OPTIMIZE_SCHEDULE, UPDATE_TODO,
};
use crate::tool::ToolError;
use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Wire envelope: a tool name and its argument map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Field-level changes for `update_todo`. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoPatch {
    #[serde(deserialize_with = "deserialize_todo_id")]
    pub id: TodoId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    pub status: Option<TodoStatus>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_due_date")]
    pub due_date: Option<DateTime<Utc>>,
    /// Removes the deadline; wins over `due_date`.
    #[serde(default)]
    pub clear_due_date: bool,
    #[serde(default)]
    pub estimated_duration: Option<String>,
}

impl TodoPatch {
    /// Merges the patch into `current`, producing the full replacement record.
    pub fn apply(&self, mut current: TodoItem) -> TodoItem {
        if let Some(title) = &self.title {
            current.title = title.clone();
        }
        if let Some(description) = &self.description {
            current.description = description.clone();
        }
        if let Some(priority) = self.priority {
            current.priority = priority;
        }
        if let Some(status) = self.status {
            current.status = status;
        }
        if let Some(category) = self.category.as_ref().filter(|c| !c.trim().is_empty()) {
            current.category = category.clone();
        }
        if let Some(estimate) = &self.estimated_duration {
            current.estimated_duration = estimate.clone();
        }
        if self.clear_due_date {
            current.due_date = None;
        } else if let Some(due_date) = self.due_date {
            current.due_date = Some(due_date);
        }
        current
    }
}

/// One typed operation per tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    ListTodos(TodoFilter),
    GetTodo { id: TodoId },
    CreateTodo(NewTodo),
    UpdateTodo(TodoPatch),
    DeleteTodo { id: TodoId },
    GetUserProfile,
    AnalyzeTasks(AnalysisKind),
    OptimizeSchedule(ScheduleRequest),
    BreakDownTask {
        task_id: TodoId,
        complexity: Complexity,
    },
}

#[derive(Deserialize)]
struct ListTodosArgs {
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    status: Option<TodoStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    priority: Option<Priority>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Deserialize)]
struct IdArgs {
    #[serde(deserialize_with = "deserialize_todo_id")]
    id: TodoId,
}

#[derive(Deserialize)]
struct AnalyzeArgs {
    #[serde(default)]
    analysis_type: Option<String>,
}

#[derive(Deserialize)]
struct OptimizeArgs {
    #[serde(default)]
    time_horizon: Option<String>,
    #[serde(default)]
    work_hours: Option<u32>,
}

#[derive(Deserialize)]
struct BreakDownArgs {
    #[serde(deserialize_with = "deserialize_todo_id")]
    task_id: TodoId,
    #[serde(default)]
    complexity: Option<String>,
}

impl ToolRequest {
    /// Validates `call` and builds the typed request.
    pub fn parse(call: &ToolCall) -> Result<Self, ToolError> {
        let tool = call.name.as_str();
        let args = Value::Object(call.arguments.clone());

        match tool {
            LIST_TODOS => {
                let args: ListTodosArgs = decode(tool, args)?;
                Ok(Self::ListTodos(TodoFilter {
                    status: args.status,
                    priority: args.priority,
                    category: non_blank(args.category),
                }))
            }
            GET_TODO => {
                let args: IdArgs = decode(tool, args)?;
                Ok(Self::GetTodo { id: args.id })
            }
            CREATE_TODO => Ok(Self::CreateTodo(decode(tool, args)?)),
            UPDATE_TODO => Ok(Self::UpdateTodo(decode(tool, args)?)),
            DELETE_TODO => {
                let args: IdArgs = decode(tool, args)?;
                Ok(Self::DeleteTodo { id: args.id })
            }
            GET_USER_PROFILE => Ok(Self::GetUserProfile),
            ANALYZE_TASKS => {
                let args: AnalyzeArgs = decode(tool, args)?;
                let kind = match non_blank(args.analysis_type) {
                    Some(value) => value.parse().map_err(|message| invalid(tool, message))?,
                    None => AnalysisKind::default(),
                };
                Ok(Self::AnalyzeTasks(kind))
            }
            OPTIMIZE_SCHEDULE => {
                let args: OptimizeArgs = decode(tool, args)?;
                let defaults = ScheduleRequest::default();
                let work_hours = match args.work_hours {
                    Some(0) => return Err(invalid(tool, "work_hours must be positive".into())),
                    Some(hours) => hours,
                    None => defaults.work_hours,
                };
                Ok(Self::OptimizeSchedule(ScheduleRequest {
                    time_horizon: non_blank(args.time_horizon)
                        .unwrap_or_else(|| DEFAULT_TIME_HORIZON.to_string()),
                    work_hours,
                }))
            }
            BREAK_DOWN_TASK => {
                let args: BreakDownArgs = decode(tool, args)?;
                let complexity = match non_blank(args.complexity) {
                    Some(value) => value.parse().map_err(|message| invalid(tool, message))?,
                    None => Complexity::default(),
                };
                Ok(Self::BreakDownTask {
                    task_id: args.task_id,
                    complexity,
                })
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::ListTodos(_) => LIST_TODOS,
            Self::GetTodo { .. } => GET_TODO,
            Self::CreateTodo(_) => CREATE_TODO,
            Self::UpdateTodo(_) => UPDATE_TODO,
            Self::DeleteTodo { .. } => DELETE_TODO,
            Self::GetUserProfile => GET_USER_PROFILE,
            Self::AnalyzeTasks(_) => ANALYZE_TASKS,
            Self::OptimizeSchedule(_) => OPTIMIZE_SCHEDULE,
            Self::BreakDownTask { .. } => BREAK_DOWN_TASK,
        }
    }
}

fn decode<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|err| invalid(tool, err.to_string()))
}

fn invalid(tool: &str, message: String) -> ToolError {
    ToolError::InvalidArguments {
        tool: tool.to_string(),
        message,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Accepts `7` and `7.0`; agents frequently send ids as JSON floats.
fn deserialize_todo_id<'de, D>(deserializer: D) -> Result<TodoId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(id) = value.as_i64() {
        return Ok(id);
    }
    match value.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => Ok(float as i64),
        _ => Err(D::Error::custom(format!("expected integer id, got {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::{ToolCall, ToolRequest};
    use crate::model::todo::{Priority, TodoStatus};
    use crate::service::analysis::{AnalysisKind, Complexity};
    use crate::tool::catalog::tool_catalog;
    use crate::tool::ToolError;
    use serde_json::json;

    #[test]
    fn every_catalog_tool_is_recognized() {
        for descriptor in tool_catalog() {
            let result = ToolRequest::parse(&ToolCall::new(descriptor.name, json!({})));
            assert!(
                !matches!(result, Err(ToolError::UnknownTool(_))),
                "{} is not dispatchable",
                descriptor.name
            );
        }
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = ToolRequest::parse(&ToolCall::new("drop_tables", json!({}))).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "drop_tables"));
    }

    #[test]
    fn float_ids_are_accepted_but_fractions_are_not() {
        let request = ToolRequest::parse(&ToolCall::new("delete_todo", json!({"id": 4.0}))).unwrap();
        assert_eq!(request, ToolRequest::DeleteTodo { id: 4 });

        let err = ToolRequest::parse(&ToolCall::new("delete_todo", json!({"id": 4.5}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn list_filters_treat_blank_values_as_absent() {
        let request = ToolRequest::parse(&ToolCall::new(
            "list_todos",
            json!({"status": "in_progress", "priority": "", "category": " "}),
        ))
        .unwrap();

        match request {
            ToolRequest::ListTodos(filter) => {
                assert_eq!(filter.status, Some(TodoStatus::InProgress));
                assert_eq!(filter.priority, None);
                assert_eq!(filter.category, None);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn create_rejects_unknown_priority_at_the_boundary() {
        let err = ToolRequest::parse(&ToolCall::new(
            "create_todo",
            json!({"title": "x", "priority": "asap"}),
        ))
        .unwrap_err();
        assert!(err.to_string().contains("unknown priority"));
    }

    #[test]
    fn analysis_and_breakdown_defaults_apply() {
        assert_eq!(
            ToolRequest::parse(&ToolCall::new("analyze_tasks", json!({}))).unwrap(),
            ToolRequest::AnalyzeTasks(AnalysisKind::Priority)
        );
        assert_eq!(
            ToolRequest::parse(&ToolCall::new("break_down_task", json!({"task_id": 2}))).unwrap(),
            ToolRequest::BreakDownTask {
                task_id: 2,
                complexity: Complexity::Medium,
            }
        );
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let request = ToolRequest::parse(&ToolCall::new(
            "update_todo",
            json!({"id": 1, "priority": "urgent"}),
        ))
        .unwrap();
        let ToolRequest::UpdateTodo(patch) = request else {
            panic!("expected update request");
        };
        assert_eq!(patch.priority, Some(Priority::Urgent));
        assert_eq!(patch.title, None);
        assert!(!patch.clear_due_date);
    }
}
