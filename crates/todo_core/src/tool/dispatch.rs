//! Executes typed tool requests against a `TodoStore`.
//!
//! # Invariants
//! - `call` always yields an envelope; failures set `isError` and carry the
//!   error kind in `data.error_kind`.
//! - Tool events log the tool name, id and outcome only.

use crate::model::timestamp::now_millis;
use crate::service::analysis::{analyze, break_down, optimize_schedule};
use crate::service::todo_store::TodoStore;
use crate::tool::request::{ToolCall, ToolRequest};
use crate::tool::ToolError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;

/// One content block of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Result envelope: human text plus optional structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<ToolContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>, data: Value) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            data: Some(data),
            is_error: false,
        }
    }

    pub fn failure(err: &ToolError) -> Self {
        Self {
            content: vec![ToolContent::text(format!("Error: {err}"))],
            data: Some(json!({ "error_kind": err.kind().as_str() })),
            is_error: true,
        }
    }

    /// All text blocks joined by newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Borrowing executor; cheap to build per call.
pub struct ToolDispatcher<'store> {
    store: &'store TodoStore,
}

impl<'store> ToolDispatcher<'store> {
    pub fn new(store: &'store TodoStore) -> Self {
        Self { store }
    }

    /// Parses and executes `call`, folding any failure into the envelope.
    pub fn call(&self, call: &ToolCall) -> ToolOutput {
        let started_at = Instant::now();
        let result = ToolRequest::parse(call).and_then(|request| self.execute(request));

        match result {
            Ok(output) => {
                info!(
                    "event=tool_call module=tool status=ok tool={} duration_ms={}",
                    call.name,
                    started_at.elapsed().as_millis()
                );
                output
            }
            Err(err) => {
                warn!(
                    "event=tool_call module=tool status=error tool={} duration_ms={} error_kind={}",
                    call.name,
                    started_at.elapsed().as_millis(),
                    err.kind().as_str()
                );
                ToolOutput::failure(&err)
            }
        }
    }

    /// Runs an already validated request.
    pub fn execute(&self, request: ToolRequest) -> Result<ToolOutput, ToolError> {
        match request {
            ToolRequest::ListTodos(filter) => {
                let todos = self.store.list_todos(&filter)?;
                Ok(ToolOutput::success(
                    format!("Found {} todos matching the criteria", todos.len()),
                    serde_json::to_value(&todos)?,
                ))
            }
            ToolRequest::GetTodo { id } => {
                let todo = self.store.get_todo(id)?;
                Ok(ToolOutput::success(
                    format!("Todo: {} (ID: {})", todo.title, todo.id),
                    serde_json::to_value(&todo)?,
                ))
            }
            ToolRequest::CreateTodo(new_todo) => {
                let todo = self.store.create_todo(new_todo)?;
                Ok(ToolOutput::success(
                    format!("Created todo: {} (ID: {})", todo.title, todo.id),
                    serde_json::to_value(&todo)?,
                ))
            }
            ToolRequest::UpdateTodo(patch) => {
                let current = self.store.get_todo(patch.id)?;
                let todo = self.store.update_todo(&patch.apply(current))?;
                Ok(ToolOutput::success(
                    format!("Updated todo: {} (ID: {})", todo.title, todo.id),
                    serde_json::to_value(&todo)?,
                ))
            }
            ToolRequest::DeleteTodo { id } => {
                let todo = self.store.get_todo(id)?;
                self.store.delete_todo(id)?;
                Ok(ToolOutput::success(
                    format!("Deleted todo: {} (ID: {})", todo.title, todo.id),
                    json!({ "id": id }),
                ))
            }
            ToolRequest::GetUserProfile => {
                let profile = self.store.get_user_profile()?;
                Ok(ToolOutput::success(
                    format!("User profile: {} ({})", profile.name, profile.timezone),
                    serde_json::to_value(&profile)?,
                ))
            }
            ToolRequest::AnalyzeTasks(kind) => {
                let todos = self.store.get_all_todos()?;
                let report = analyze(kind, &todos, now_millis());
                Ok(ToolOutput::success(
                    report.to_string(),
                    serde_json::to_value(&report)?,
                ))
            }
            ToolRequest::OptimizeSchedule(schedule) => {
                let todos = self.store.get_all_todos()?;
                let plan = optimize_schedule(&todos, &schedule);
                Ok(ToolOutput::success(
                    plan.to_string(),
                    serde_json::to_value(&plan)?,
                ))
            }
            ToolRequest::BreakDownTask {
                task_id,
                complexity,
            } => {
                let todo = self.store.get_todo(task_id)?;
                let plan = break_down(&todo, complexity);
                Ok(ToolOutput::success(
                    plan.to_string(),
                    serde_json::to_value(&plan)?,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ToolDispatcher, ToolOutput};
    use crate::service::todo_store::TodoStore;
    use crate::tool::request::ToolCall;
    use serde_json::json;

    #[test]
    fn failure_envelope_carries_error_kind() {
        let store = TodoStore::open_in_memory().unwrap();
        let output = ToolDispatcher::new(&store).call(&ToolCall::new("get_todo", json!({"id": 9})));

        assert!(output.is_error);
        assert_eq!(output.data.unwrap()["error_kind"], "not_found");
        assert_eq!(output.content[0].text, "Error: todo with id 9 not found");
    }

    #[test]
    fn output_serializes_with_wire_field_names() {
        let output = ToolOutput::success("ok", json!({}));
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["isError"], false);
    }
}
