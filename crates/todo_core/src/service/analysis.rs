//! Fixed-template task analysis.
//!
//! Everything here is counting and canned text over an already ordered todo
//! slice; there is no inference. `now` is always passed in so results are
//! reproducible.

use crate::model::todo::{Priority, TodoId, TodoItem, TodoStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Items untouched for longer than this are stale.
pub const STALE_AFTER_DAYS: i64 = 30;
pub const DEFAULT_WORK_HOURS: u32 = 8;
pub const DEFAULT_TIME_HORIZON: &str = "today";

const SCHEDULE_RECOMMENDATIONS: [&str; 4] = [
    "Start with urgent tasks in the morning when energy is highest",
    "Group similar tasks together for efficiency",
    "Schedule breaks between complex tasks",
    "Reserve buffer time for unexpected issues",
];

const SIMPLE_STEPS: &[&str] = &[
    "Plan the task (15 minutes)",
    "Execute the main work (1-2 hours)",
    "Review and finalize (15 minutes)",
];

const MEDIUM_STEPS: &[&str] = &[
    "Research and planning (30 minutes)",
    "Break into smaller components (15 minutes)",
    "Execute main work (2-4 hours)",
    "Review and iterate (30 minutes)",
    "Final quality check (15 minutes)",
];

const COMPLEX_STEPS: &[&str] = &[
    "Comprehensive research (1-2 hours)",
    "Create detailed plan (30 minutes)",
    "Identify dependencies (30 minutes)",
    "Execute phase 1 (2-3 hours)",
    "Review and adjust plan (30 minutes)",
    "Execute phase 2 (2-3 hours)",
    "Integration and testing (1 hour)",
    "Final review and documentation (1 hour)",
];

/// Which bucket report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    #[default]
    Priority,
    Overdue,
    Stale,
    Workload,
}

impl AnalysisKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Overdue => "overdue",
            Self::Stale => "stale",
            Self::Workload => "workload",
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "priority" => Ok(Self::Priority),
            "overdue" => Ok(Self::Overdue),
            "stale" => Ok(Self::Stale),
            "workload" => Ok(Self::Workload),
            other => Err(format!(
                "unknown analysis type `{other}`; expected priority|overdue|stale|workload"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub urgent: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkloadCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Result of one bucket report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "analysis_type", rename_all = "snake_case")]
pub enum TaskAnalysis {
    Priority(PriorityCounts),
    Overdue { overdue: usize },
    Stale { stale: usize },
    Workload(WorkloadCounts),
}

impl Display for TaskAnalysis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Priority(counts) => write!(
                f,
                "Priority Analysis: Urgent: {}, High: {}, Medium: {}, Low: {}",
                counts.urgent, counts.high, counts.medium, counts.low
            ),
            Self::Overdue { overdue } => {
                write!(f, "Overdue Analysis: {overdue} tasks are overdue")
            }
            Self::Stale { stale } => write!(
                f,
                "Stale Analysis: {stale} tasks haven't been updated in {STALE_AFTER_DAYS}+ days"
            ),
            Self::Workload(counts) => write!(
                f,
                "Workload Analysis: Pending: {}, In Progress: {}, Completed: {}",
                counts.pending, counts.in_progress, counts.completed
            ),
        }
    }
}

/// Runs the `kind` report over `todos`.
pub fn analyze(kind: AnalysisKind, todos: &[TodoItem], now: DateTime<Utc>) -> TaskAnalysis {
    match kind {
        AnalysisKind::Priority => TaskAnalysis::Priority(count_priorities(todos)),
        AnalysisKind::Overdue => TaskAnalysis::Overdue {
            overdue: todos.iter().filter(|todo| todo.is_overdue(now)).count(),
        },
        AnalysisKind::Stale => TaskAnalysis::Stale {
            stale: todos.iter().filter(|todo| is_stale(todo, now)).count(),
        },
        AnalysisKind::Workload => TaskAnalysis::Workload(count_workload(todos)),
    }
}

/// Untouched for more than `STALE_AFTER_DAYS`.
pub fn is_stale(todo: &TodoItem, now: DateTime<Utc>) -> bool {
    now - todo.last_updated > Duration::days(STALE_AFTER_DAYS)
}

fn count_priorities(todos: &[TodoItem]) -> PriorityCounts {
    todos
        .iter()
        .fold(PriorityCounts::default(), |mut counts, todo| {
            match todo.priority {
                Priority::Urgent => counts.urgent += 1,
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
            counts
        })
}

fn count_workload(todos: &[TodoItem]) -> WorkloadCounts {
    todos
        .iter()
        .fold(WorkloadCounts::default(), |mut counts, todo| {
            match todo.status {
                TodoStatus::Pending => counts.pending += 1,
                TodoStatus::InProgress => counts.in_progress += 1,
                TodoStatus::Completed => counts.completed += 1,
                TodoStatus::Scheduled => {}
            }
            counts
        })
}

/// Scheduling window for `optimize_schedule`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub time_horizon: String,
    pub work_hours: u32,
}

impl Default for ScheduleRequest {
    fn default() -> Self {
        Self {
            time_horizon: DEFAULT_TIME_HORIZON.to_string(),
            work_hours: DEFAULT_WORK_HOURS,
        }
    }
}

/// Open urgent/high items plus the standing recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleOptimization {
    pub time_horizon: String,
    pub work_hours: u32,
    /// Ids of the open urgent/high items, in display order.
    pub focus_task_ids: Vec<TodoId>,
    pub recommendations: Vec<&'static str>,
}

impl Display for ScheduleOptimization {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Schedule Optimization for {} ({} work hours):",
            self.time_horizon, self.work_hours
        )?;
        writeln!(
            f,
            "Found {} high-priority tasks to schedule",
            self.focus_task_ids.len()
        )?;
        write!(f, "Recommendations:")?;
        for recommendation in &self.recommendations {
            write!(f, "\n- {recommendation}")?;
        }
        Ok(())
    }
}

pub fn optimize_schedule(todos: &[TodoItem], request: &ScheduleRequest) -> ScheduleOptimization {
    let focus_task_ids = todos
        .iter()
        .filter(|todo| todo.status.is_open())
        .filter(|todo| matches!(todo.priority, Priority::Urgent | Priority::High))
        .map(|todo| todo.id)
        .collect();

    ScheduleOptimization {
        time_horizon: request.time_horizon.clone(),
        work_hours: request.work_hours,
        focus_task_ids,
        recommendations: SCHEDULE_RECOMMENDATIONS.to_vec(),
    }
}

/// Breakdown template size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    #[default]
    Medium,
    Complex,
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }

    fn steps(self) -> &'static [&'static str] {
        match self {
            Self::Simple => SIMPLE_STEPS,
            Self::Medium => MEDIUM_STEPS,
            Self::Complex => COMPLEX_STEPS,
        }
    }
}

impl FromStr for Complexity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "simple" => Ok(Self::Simple),
            "medium" => Ok(Self::Medium),
            "complex" => Ok(Self::Complex),
            other => Err(format!(
                "unknown complexity `{other}`; expected simple|medium|complex"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskBreakdown {
    pub task_id: TodoId,
    pub title: String,
    pub complexity: Complexity,
    pub subtasks: Vec<&'static str>,
}

impl Display for TaskBreakdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Task Breakdown for: {}", self.title)?;
        writeln!(f, "Complexity: {}", self.complexity.as_str())?;
        write!(f, "\nSuggested subtasks:")?;
        for (index, step) in self.subtasks.iter().enumerate() {
            write!(f, "\n{}. {step}", index + 1)?;
        }
        Ok(())
    }
}

pub fn break_down(todo: &TodoItem, complexity: Complexity) -> TaskBreakdown {
    TaskBreakdown {
        task_id: todo.id,
        title: todo.title.clone(),
        complexity,
        subtasks: complexity.steps().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        analyze, break_down, optimize_schedule, AnalysisKind, Complexity, ScheduleRequest,
        TaskAnalysis, WorkloadCounts,
    };
    use crate::model::todo::{Priority, TodoItem, TodoStatus};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn todo(id: i64, priority: Priority, status: TodoStatus) -> TodoItem {
        TodoItem {
            id,
            title: format!("task {id}"),
            description: String::new(),
            priority,
            status,
            category: "work".to_string(),
            created_date: now() - Duration::days(1),
            due_date: None,
            last_updated: now() - Duration::days(1),
            estimated_duration: String::new(),
        }
    }

    #[test]
    fn priority_report_counts_each_bucket() {
        let todos = vec![
            todo(1, Priority::Urgent, TodoStatus::Pending),
            todo(2, Priority::High, TodoStatus::Pending),
            todo(3, Priority::High, TodoStatus::Completed),
            todo(4, Priority::Low, TodoStatus::Pending),
        ];

        let report = analyze(AnalysisKind::Priority, &todos, now());
        assert_eq!(
            report.to_string(),
            "Priority Analysis: Urgent: 1, High: 2, Medium: 0, Low: 1"
        );
    }

    #[test]
    fn overdue_ignores_completed_and_undated_items() {
        let mut late = todo(1, Priority::High, TodoStatus::Pending);
        late.due_date = Some(now() - Duration::hours(1));
        let mut done_late = todo(2, Priority::High, TodoStatus::Completed);
        done_late.due_date = Some(now() - Duration::days(3));
        let mut future = todo(3, Priority::High, TodoStatus::Pending);
        future.due_date = Some(now() + Duration::days(3));
        let undated = todo(4, Priority::High, TodoStatus::Pending);

        let report = analyze(
            AnalysisKind::Overdue,
            &[late, done_late, future, undated],
            now(),
        );
        assert_eq!(report, TaskAnalysis::Overdue { overdue: 1 });
    }

    #[test]
    fn stale_uses_thirty_day_threshold() {
        let mut stale = todo(1, Priority::Low, TodoStatus::Pending);
        stale.created_date = now() - Duration::days(40);
        stale.last_updated = now() - Duration::days(31);
        let mut boundary = todo(2, Priority::Low, TodoStatus::Pending);
        boundary.created_date = now() - Duration::days(40);
        boundary.last_updated = now() - Duration::days(30);

        let report = analyze(AnalysisKind::Stale, &[stale, boundary], now());
        assert_eq!(report, TaskAnalysis::Stale { stale: 1 });
    }

    #[test]
    fn workload_skips_scheduled_items() {
        let todos = vec![
            todo(1, Priority::Medium, TodoStatus::Pending),
            todo(2, Priority::Medium, TodoStatus::InProgress),
            todo(3, Priority::Medium, TodoStatus::Scheduled),
        ];

        let report = analyze(AnalysisKind::Workload, &todos, now());
        assert_eq!(
            report,
            TaskAnalysis::Workload(WorkloadCounts {
                pending: 1,
                in_progress: 1,
                completed: 0,
            })
        );
    }

    #[test]
    fn schedule_focuses_open_urgent_and_high_items() {
        let todos = vec![
            todo(1, Priority::Urgent, TodoStatus::InProgress),
            todo(2, Priority::High, TodoStatus::Completed),
            todo(3, Priority::Medium, TodoStatus::Pending),
            todo(4, Priority::High, TodoStatus::Pending),
        ];

        let plan = optimize_schedule(&todos, &ScheduleRequest::default());
        assert_eq!(plan.focus_task_ids, vec![1, 4]);
        let text = plan.to_string();
        assert!(text.starts_with("Schedule Optimization for today (8 work hours):"));
        assert!(text.contains("Found 2 high-priority tasks to schedule"));
    }

    #[test]
    fn breakdown_uses_complexity_template() {
        let item = todo(5, Priority::High, TodoStatus::Pending);
        let plan = break_down(&item, Complexity::Complex);
        assert_eq!(plan.subtasks.len(), 8);
        assert!(plan.to_string().contains("8. Final review and documentation (1 hour)"));
        assert_eq!("simple".parse::<Complexity>(), Ok(Complexity::Simple));
    }
}
