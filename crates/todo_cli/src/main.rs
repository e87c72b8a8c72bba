//! `todo` command-line entry point.
//!
//! # Responsibility
//! - Build `CoreConfig` from flags and environment, then open the store.
//! - Route every todo command through the tool dispatcher so the CLI and
//!   agent callers share one validation path.
//! - Print JSON by default, plain text with `-H`; exit 1 on any failure.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, TodoFields};
use log::{error, info};
use serde_json::{json, Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process;
use std::time::Instant;
use todo_core::tool::catalog::{
    tool_catalog, ANALYZE_TASKS, BREAK_DOWN_TASK, CREATE_TODO, DELETE_TODO, GET_TODO,
    GET_USER_PROFILE, LIST_TODOS, OPTIMIZE_SCHEDULE, UPDATE_TODO,
};
use todo_core::{
    import_file, init_logging, ConfigError, CoreConfig, ImportError, StoreError, ToolCall,
    ToolDispatcher, ToolOutput, TodoStore,
};

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(todo_core::logging::LoggingError),
    Store(StoreError),
    Import(ImportError),
    InvalidCall(serde_json::Error),
    Encode(serde_json::Error),
    Tool(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::InvalidCall(err) => write!(f, "invalid tool call JSON: {err}"),
            Self::Encode(err) => write!(f, "failed to encode output: {err}"),
            Self::Tool(message) => write!(f, "{message}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::InvalidCall(err) | Self::Encode(err) => Some(err),
            Self::Tool(_) => None,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    if let Err(err) = run(cli) {
        if human {
            eprintln!("Error: {err}");
        } else {
            eprintln!("{}", json!({ "error": err.to_string() }));
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = build_config(&cli);
    config.validate().map_err(CliError::Config)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).map_err(CliError::Logging)?;
    }

    let human = cli.human_readable;
    let command_name = command_name(&cli.command);
    let started_at = Instant::now();
    info!("event=cli_command module=cli status=start command={command_name}");

    let result = execute(cli.command, &config, human);
    match &result {
        Ok(()) => info!(
            "event=cli_command module=cli status=ok command={} duration_ms={}",
            command_name,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=cli_command module=cli status=error command={} duration_ms={} error={}",
            command_name,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn build_config(cli: &Cli) -> CoreConfig {
    let mut config = CoreConfig::default().with_db_path(&cli.db_path);
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.log_dir = cli.log_dir.clone();
    config
}

fn execute(command: Commands, config: &CoreConfig, human: bool) -> Result<(), CliError> {
    if let Commands::Tools = command {
        return print_catalog(human);
    }

    let store = TodoStore::from_config(config).map_err(CliError::Store)?;

    let call = match command {
        Commands::Import { file } => {
            let summary = import_file(&store, &file).map_err(CliError::Import)?;
            let text = format!(
                "Imported {} todos (profile: {}); next id {}",
                summary.todos_imported,
                if summary.profile_imported { "yes" } else { "no" },
                summary.next_id
            );
            let data = serde_json::to_value(&summary).map_err(CliError::Encode)?;
            return print_output(&ToolOutput::success(text, data), human);
        }
        Commands::Call { json } => serde_json::from_str(&json).map_err(CliError::InvalidCall)?,
        other => tool_call_for(other)
            .ok_or_else(|| CliError::Tool("command has no tool mapping".to_string()))?,
    };

    let output = ToolDispatcher::new(&store).call(&call);
    if output.is_error {
        return Err(CliError::Tool(output.text()));
    }
    print_output(&output, human)
}

/// Maps a todo subcommand to its tool invocation.
fn tool_call_for(command: Commands) -> Option<ToolCall> {
    let (name, arguments) = match command {
        Commands::List {
            status,
            priority,
            category,
        } => {
            let mut args = Map::new();
            insert_opt(&mut args, "status", status);
            insert_opt(&mut args, "priority", priority);
            insert_opt(&mut args, "category", category);
            (LIST_TODOS, args)
        }
        Commands::Get { id } => (GET_TODO, id_args("id", id)),
        Commands::Add { title, fields } => {
            let mut args = field_args(fields);
            args.insert("title".into(), Value::String(title));
            (CREATE_TODO, args)
        }
        Commands::Update {
            id,
            title,
            fields,
            clear_due,
        } => {
            let mut args = field_args(fields);
            args.insert("id".into(), json!(id));
            insert_opt(&mut args, "title", title);
            if clear_due {
                args.insert("clear_due_date".into(), Value::Bool(true));
            }
            (UPDATE_TODO, args)
        }
        Commands::Delete { id } => (DELETE_TODO, id_args("id", id)),
        Commands::Profile => (GET_USER_PROFILE, Map::new()),
        Commands::Analyze { analysis_type } => {
            let mut args = Map::new();
            args.insert("analysis_type".into(), Value::String(analysis_type));
            (ANALYZE_TASKS, args)
        }
        Commands::Optimize { horizon, hours } => {
            let mut args = Map::new();
            insert_opt(&mut args, "time_horizon", horizon);
            if let Some(hours) = hours {
                args.insert("work_hours".into(), json!(hours));
            }
            (OPTIMIZE_SCHEDULE, args)
        }
        Commands::Breakdown { id, complexity } => {
            let mut args = id_args("task_id", id);
            insert_opt(&mut args, "complexity", complexity);
            (BREAK_DOWN_TASK, args)
        }
        Commands::Tools | Commands::Import { .. } | Commands::Call { .. } => return None,
    };

    Some(ToolCall {
        name: name.to_string(),
        arguments,
    })
}

fn field_args(fields: TodoFields) -> Map<String, Value> {
    let mut args = Map::new();
    insert_opt(&mut args, "description", fields.description);
    insert_opt(&mut args, "priority", fields.priority);
    insert_opt(&mut args, "status", fields.status);
    insert_opt(&mut args, "category", fields.category);
    insert_opt(&mut args, "due_date", fields.due);
    insert_opt(&mut args, "estimated_duration", fields.estimate);
    args
}

fn id_args(key: &str, id: i64) -> Map<String, Value> {
    let mut args = Map::new();
    args.insert(key.to_string(), json!(id));
    args
}

fn insert_opt(args: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        args.insert(key.to_string(), Value::String(value));
    }
}

fn print_catalog(human: bool) -> Result<(), CliError> {
    let catalog = tool_catalog();
    if human {
        for tool in &catalog {
            println!("{:<18} {}", tool.name, tool.description);
        }
        return Ok(());
    }
    let text = serde_json::to_string_pretty(&catalog).map_err(CliError::Encode)?;
    println!("{text}");
    Ok(())
}

fn print_output(output: &ToolOutput, human: bool) -> Result<(), CliError> {
    if human {
        println!("{}", output.text());
        return Ok(());
    }
    let data = output.data.clone().unwrap_or(Value::Null);
    let text = serde_json::to_string_pretty(&data).map_err(CliError::Encode)?;
    println!("{text}");
    Ok(())
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::List { .. } => "list",
        Commands::Get { .. } => "get",
        Commands::Add { .. } => "add",
        Commands::Update { .. } => "update",
        Commands::Delete { .. } => "delete",
        Commands::Profile => "profile",
        Commands::Import { .. } => "import",
        Commands::Analyze { .. } => "analyze",
        Commands::Optimize { .. } => "optimize",
        Commands::Breakdown { .. } => "breakdown",
        Commands::Tools => "tools",
        Commands::Call { .. } => "call",
    }
}
