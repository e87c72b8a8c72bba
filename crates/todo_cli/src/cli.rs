//! CLI argument definitions for `todo`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Database file used when neither `--db` nor `TODO_DB` is given.
pub const DEFAULT_DB_FILE: &str = "todos.db";

/// todo - a prioritized todo list for humans and agents.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about = "Prioritized todo list backed by SQLite", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// SQLite database file, created on first use
    #[arg(long = "db", global = true, env = "TODO_DB", default_value = DEFAULT_DB_FILE)]
    pub db_path: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long = "log-level", global = true, env = "TODO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long = "log-dir", global = true, env = "TODO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List todos in display order
    List {
        /// Only this status (pending|in_progress|completed|scheduled)
        #[arg(long)]
        status: Option<String>,

        /// Only this priority (urgent|high|medium|low)
        #[arg(long)]
        priority: Option<String>,

        /// Only this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one todo
    Get {
        /// Todo id
        id: i64,
    },

    /// Create a todo
    Add {
        /// Todo title
        title: String,

        #[command(flatten)]
        fields: TodoFields,
    },

    /// Change fields of an existing todo
    Update {
        /// Todo id
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: TodoFields,

        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },

    /// Delete a todo permanently
    Delete {
        /// Todo id
        id: i64,
    },

    /// Show the user profile
    Profile,

    /// Load a JSON snapshot (profile and todos) into the store
    Import {
        /// Snapshot file
        file: PathBuf,
    },

    /// Summarize todos (priority|overdue|stale|workload)
    Analyze {
        #[arg(default_value = "priority")]
        analysis_type: String,
    },

    /// Suggest a focus list for a time window
    Optimize {
        /// Time window label (e.g. today, this week)
        #[arg(long)]
        horizon: Option<String>,

        /// Available work hours
        #[arg(long)]
        hours: Option<u32>,
    },

    /// Split a todo into suggested subtasks
    Breakdown {
        /// Todo id
        id: i64,

        /// simple|medium|complex
        #[arg(long)]
        complexity: Option<String>,
    },

    /// Print the tool catalog
    Tools,

    /// Invoke one tool from a JSON envelope: {"name": ..., "arguments": {...}}
    Call {
        /// Tool call JSON
        json: String,
    },
}

/// Optional todo fields shared by `add` and `update`.
#[derive(Args, Debug, Default)]
pub struct TodoFields {
    /// Longer description
    #[arg(long)]
    pub description: Option<String>,

    /// urgent|high|medium|low
    #[arg(long)]
    pub priority: Option<String>,

    /// pending|in_progress|completed|scheduled
    #[arg(long)]
    pub status: Option<String>,

    /// Free-form grouping label
    #[arg(long)]
    pub category: Option<String>,

    /// Due date (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Estimated effort, e.g. "2 hours"
    #[arg(long)]
    pub estimate: Option<String>,
}
