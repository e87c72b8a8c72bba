//! Todo item model.
//!
//! # Responsibility
//! - Define the canonical `TodoItem` record and its enumerations.
//! - Apply the creation default policy (`NewTodo::into_item`).
//!
//! # Invariants
//! - `id` is positive and assigned by the store, never by callers.
//! - `title` is non-empty after trimming.
//! - `created_date <= last_updated`.

use crate::model::timestamp::{parse_timestamp, truncate_to_millis};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned todo identifier.
pub type TodoId = i64;

/// Largest storable id. `TodoId::MAX` is excluded so a next id always exists.
pub const MAX_TODO_ID: TodoId = TodoId::MAX - 1;

/// Category applied when the caller leaves it blank.
pub const DEFAULT_CATEGORY: &str = "personal";

/// Validation failures for caller-supplied todo data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// `title` is missing or blank.
    EmptyTitle,
    /// Id is zero or negative.
    InvalidId(TodoId),
    /// Priority label outside `urgent|high|medium|low`.
    UnknownPriority(String),
    /// Status label outside `pending|in_progress|completed|scheduled`.
    UnknownStatus(String),
    /// Due date text is neither RFC 3339 nor `YYYY-MM-DD`.
    InvalidDueDate(String),
    /// `last_updated` precedes `created_date`.
    TimestampOrder,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::InvalidId(id) => write!(
                f,
                "todo id must be between 1 and {MAX_TODO_ID}, got {id}"
            ),
            Self::UnknownPriority(value) => write!(
                f,
                "unknown priority `{value}`; expected urgent|high|medium|low"
            ),
            Self::UnknownStatus(value) => write!(
                f,
                "unknown status `{value}`; expected pending|in_progress|completed|scheduled"
            ),
            Self::InvalidDueDate(value) => write!(
                f,
                "invalid due date `{value}`; expected RFC 3339 or YYYY-MM-DD"
            ),
            Self::TimestampOrder => write!(f, "last_updated must not precede created_date"),
        }
    }
}

impl Error for TodoValidationError {}

/// Task urgency. Declaration order is the display rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Self::Urgent, Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank, lower sorts first.
    pub fn rank(self) -> u8 {
        crate::ordering::priority_rank(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TodoValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value.trim())
            .ok_or_else(|| TodoValidationError::UnknownPriority(value.to_string()))
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Scheduled,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Scheduled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Scheduled => "scheduled",
        }
    }

    /// Whether the task still needs work.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl FromStr for TodoStatus {
    type Err = TodoValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value.trim())
            .ok_or_else(|| TodoValidationError::UnknownStatus(value.to_string()))
    }
}

impl Display for TodoStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: TodoStatus,
    pub category: String,
    /// Set once at creation.
    pub created_date: DateTime<Utc>,
    /// `None` means no deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Refreshed by every successful update.
    pub last_updated: DateTime<Utc>,
    /// Free text such as `"2 hours"`, returned verbatim.
    #[serde(default)]
    pub estimated_duration: String,
}

impl TodoItem {
    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if !(1..=MAX_TODO_ID).contains(&self.id) {
            return Err(TodoValidationError::InvalidId(self.id));
        }
        if self.title.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        if self.last_updated < self.created_date {
            return Err(TodoValidationError::TimestampOrder);
        }
        Ok(())
    }

    /// Past its due date and not completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TodoStatus::Completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// Creation request. Any `id` a caller sends is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `None` (or an empty label on the wire) means `medium`.
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    pub priority: Option<Priority>,
    /// `None` (or an empty label on the wire) means `pending`.
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    pub status: Option<TodoStatus>,
    /// `None` or blank means `personal`.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_due_date")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_duration: String,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: TodoStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_estimated_duration(mut self, estimate: impl Into<String>) -> Self {
        self.estimated_duration = estimate.into();
        self
    }

    /// Finalizes the request into a stored record.
    ///
    /// # Contract
    /// - `created_date == last_updated == now`.
    /// - `due_date` is truncated to milliseconds, the stored precision.
    /// - Missing priority/status/category get `medium`/`pending`/`personal`.
    /// - Fails with `EmptyTitle` when the title is blank.
    pub fn into_item(self, id: TodoId, now: DateTime<Utc>) -> Result<TodoItem, TodoValidationError> {
        let category = match self.category {
            Some(category) if !category.trim().is_empty() => category,
            _ => DEFAULT_CATEGORY.to_string(),
        };

        let item = TodoItem {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            category,
            created_date: now,
            due_date: self.due_date.map(truncate_to_millis),
            last_updated: now,
            estimated_duration: self.estimated_duration,
        };
        item.validate()?;
        Ok(item)
    }
}

/// Parses an optional priority label; blank means "not supplied".
pub fn parse_priority_label(value: &str) -> Result<Option<Priority>, TodoValidationError> {
    parse_optional(value)
}

/// Parses an optional status label; blank means "not supplied".
pub fn parse_status_label(value: &str) -> Result<Option<TodoStatus>, TodoValidationError> {
    parse_optional(value)
}

/// Parses optional due date text; blank means "no deadline".
pub fn parse_due_date(value: &str) -> Result<Option<DateTime<Utc>>, TodoValidationError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(value)
        .map(Some)
        .ok_or_else(|| TodoValidationError::InvalidDueDate(value.to_string()))
}

fn parse_optional<T>(value: &str) -> Result<Option<T>, TodoValidationError>
where
    T: FromStr<Err = TodoValidationError>,
{
    if value.trim().is_empty() {
        return Ok(None);
    }
    value.parse().map(Some)
}

/// Serde adapter: `null`, missing or `""` become `None`, anything else must parse.
pub(crate) fn deserialize_optional_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = TodoValidationError>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_optional(&value).map_err(D::Error::custom),
        None => Ok(None),
    }
}

/// Serde adapter for due dates with the same blank-means-absent rule.
pub(crate) fn deserialize_optional_due_date<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_due_date(&value).map_err(D::Error::custom),
        None => Ok(None),
    }
}
