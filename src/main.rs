use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

mod adapters;
mod application;
mod domain;
mod ports;

use adapters::{FileConfigStore, FileEventLog, JsonFileTaskRepository};
use application::{AppError, AppResult, ReportGenerator, TaskStore};
use domain::{parse_due_date, DomainError, Priority, Task, TaskId, TaskStatus};
use ports::{AppConfig, ConfigStore, EventLog};

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id")
        .help(help)
        .required(true)
        .value_parser(value_parser!(i64))
        .index(1)
}

fn cli() -> Command {
    Command::new("task-tracker")
        .version("0.1.0")
        .about("Track tasks in a local JSON file")
        .long_about("Track tasks in a local JSON file.\n\nEvery change is saved immediately and recorded in an append-only log.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("data-file")
                .long("data-file")
                .value_name("PATH")
                .help("Task data file (can also be set via TASK_TRACKER_DATA_FILE)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Event log file (can also be set via TASK_TRACKER_LOG_FILE)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("config-file")
                .long("config")
                .value_name("PATH")
                .help("Configuration file to use instead of the default location")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print task listings as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show debug diagnostics on stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("add")
                .about("Add a development task")
                .arg(id_arg("Unique task ID"))
                .arg(
                    Arg::new("title")
                        .long("title")
                        .short('t')
                        .required(true)
                        .help("Task title"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .default_value("")
                        .help("Task description"),
                )
                .arg(
                    Arg::new("due")
                        .long("due")
                        .value_name("DATE")
                        .required(true)
                        .value_parser(parse_due_date)
                        .help("Due date: YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339"),
                )
                .arg(
                    Arg::new("priority")
                        .long("priority")
                        .short('p')
                        .default_value("medium")
                        .value_parser(value_parser!(Priority))
                        .help("low, medium or high"),
                )
                .arg(
                    Arg::new("assignee")
                        .long("assignee")
                        .short('a')
                        .required(true)
                        .help("Person responsible for the task"),
                )
                .arg(
                    Arg::new("reviewer")
                        .long("reviewer")
                        .short('r')
                        .default_value("")
                        .help("Code reviewer"),
                ),
        )
        .subcommand(Command::new("list").about("List all tasks"))
        .subcommand(
            Command::new("get")
                .about("Show a task by ID")
                .arg(id_arg("Task ID to show")),
        )
        .subcommand(
            Command::new("status")
                .about("Update a task's status")
                .arg(id_arg("Task ID to update"))
                .arg(
                    Arg::new("status")
                        .help("todo, in-progress or done")
                        .required(true)
                        .value_parser(value_parser!(TaskStatus))
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a task")
                .arg(id_arg("Task ID to delete")),
        )
        .subcommand(
            Command::new("search")
                .about("Find tasks by assignee (case-insensitive, exact)")
                .arg(
                    Arg::new("assignee")
                        .help("Assignee name")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("sort")
                .about("List tasks in order")
                .arg(
                    Arg::new("by")
                        .help("Sort key")
                        .required(true)
                        .value_parser(["priority", "due"])
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Export an overdue/upcoming report")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("PATH")
                        .value_parser(value_parser!(PathBuf))
                        .help("Report file (defaults to the configured report file)"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Configuration operations")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(
                    Command::new("save")
                        .about("Save the effective configuration, including overrides"),
                ),
        )
}

/// Global args propagate down, so the innermost matches see all of them.
fn leaf_matches(matches: &ArgMatches) -> &ArgMatches {
    let mut current = matches;
    while let Some((_, sub)) = current.subcommand() {
        current = sub;
    }
    current
}

fn required<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, name: &str) -> AppResult<T> {
    matches
        .get_one::<T>(name)
        .cloned()
        .ok_or_else(|| DomainError::MissingField(name.to_string()).into())
}

// Precedence: flag > environment > config file > defaults.
fn apply_overrides(config: &mut AppConfig, globals: &ArgMatches) {
    let overrides = [
        ("data-file", "TASK_TRACKER_DATA_FILE", &mut config.data_file),
        ("log-file", "TASK_TRACKER_LOG_FILE", &mut config.log_file),
    ];
    for (arg, env_var, target) in overrides {
        if let Some(path) = globals.get_one::<PathBuf>(arg) {
            *target = path.clone();
        } else if let Ok(path) = std::env::var(env_var) {
            *target = PathBuf::from(path);
        }
    }

    if let Ok(path) = std::env::var("TASK_TRACKER_REPORT_FILE") {
        config.report_file = PathBuf::from(path);
    }
}

fn print_tasks(tasks: &[Task], json: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }

    println!("--- Task List ---");
    if tasks.is_empty() {
        println!("No tasks found.");
    }
    for task in tasks {
        println!("{task}");
    }
    Ok(())
}

fn run_config(matches: &ArgMatches, config: &AppConfig, store: &FileConfigStore) -> AppResult<()> {
    match matches.subcommand() {
        Some(("show", _)) => {
            println!("config file: {}", store.path().display());
            println!("data file:   {}", config.data_file.display());
            println!("log file:    {}", config.log_file.display());
            println!("report file: {}", config.report_file.display());
        }
        Some(("save", _)) => {
            store.save_config(config)?;
            println!("Configuration saved to {}", store.path().display());
        }
        _ => {
            eprintln!("❌ Unknown config subcommand");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run(matches: &ArgMatches, config: &AppConfig, config_store: &FileConfigStore) -> AppResult<()> {
    let json = leaf_matches(matches).get_flag("json");

    let repository = Arc::new(JsonFileTaskRepository::new(&config.data_file));
    let log = FileEventLog::new(&config.log_file);
    tracing::debug!(
        "Using data file {} and log file {}",
        repository.path().display(),
        log.path().display()
    );
    let event_log: Arc<dyn EventLog> = Arc::new(log);

    match matches.subcommand() {
        Some(("config", config_matches)) => run_config(config_matches, config, config_store)?,
        Some(("add", m)) => {
            let mut store = TaskStore::new(repository, event_log);
            let task = Task::development(
                TaskId(required(m, "id")?),
                required::<String>(m, "title")?,
                required::<String>(m, "description")?,
                required(m, "due")?,
                required(m, "priority")?,
                required::<String>(m, "assignee")?,
                required::<String>(m, "reviewer")?,
            )?;
            store.add(task)?;
            println!("Task added successfully.");
        }
        Some(("list", _)) => {
            let store = TaskStore::new(repository, event_log);
            print_tasks(&store.get_all(), json)?;
            if !json {
                println!("{} task(s)", store.len());
            }
        }
        Some(("get", m)) => {
            let store = TaskStore::new(repository, event_log);
            let id = TaskId(required(m, "id")?);
            let task = store.get_by_id(id).ok_or(DomainError::NotFound(id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(task)?);
            } else {
                println!("Task Found:");
                println!("{task}");
            }
        }
        Some(("status", m)) => {
            let mut store = TaskStore::new(repository, event_log);
            let id = TaskId(required(m, "id")?);
            let status: TaskStatus = required(m, "status")?;
            let previous = store.update_status(id, status)?;
            if previous == status {
                println!("Task {id} is already {status}.");
            } else {
                println!("Status updated from {previous} to {status}.");
            }
        }
        Some(("delete", m)) => {
            let mut store = TaskStore::new(repository, event_log);
            let removed = store.delete(TaskId(required(m, "id")?))?;
            println!("Deleted: {removed}");
        }
        Some(("search", m)) => {
            let store = TaskStore::new(repository, event_log);
            let assignee: String = required(m, "assignee")?;
            print_tasks(&store.search_by_assignee(&assignee), json)?;
        }
        Some(("sort", m)) => {
            let store = TaskStore::new(repository, event_log);
            let tasks = match required::<String>(m, "by")?.as_str() {
                "priority" => store.sort_by_priority(),
                _ => store.sort_by_due_date(),
            };
            print_tasks(&tasks, json)?;
        }
        Some(("report", m)) => {
            let store = TaskStore::new(repository, event_log.clone());
            if store.is_empty() {
                println!("No tasks stored; the report will list none.");
            }
            let path = m
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| config.report_file.clone());

            ReportGenerator::new(event_log).export_report(&store.sort_by_due_date(), &path)?;
            let shown = std::fs::canonicalize(&path).unwrap_or(path);
            println!("Report exported to {}", shown.display());
        }
        _ => {
            eprintln!("❌ Unknown command");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    // Initialize color-eyre for better error reporting
    color_eyre::install()?;

    let matches = cli().get_matches();
    let globals = leaf_matches(&matches);

    // Diagnostics go to stderr; the event log file is the audit trail
    let level = if globals.get_flag("verbose") {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let config_store = match globals.get_one::<PathBuf>("config-file") {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new()?,
    };
    let mut config = config_store.load_config()?;
    apply_overrides(&mut config, globals);

    if let Err(e) = run(&matches, &config, &config_store) {
        match &e {
            AppError::Domain(err) => eprintln!("❌ {err}"),
            _ => eprintln!("❌ Application error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_add_parses_typed_values() {
        let matches = cli()
            .try_get_matches_from([
                "task-tracker",
                "add",
                "42",
                "--title",
                "Write docs",
                "--due",
                "2026-11-01",
                "--priority",
                "high",
                "--assignee",
                "Ivy",
            ])
            .unwrap();
        let (name, m) = matches.subcommand().unwrap();
        assert_eq!(name, "add");
        assert_eq!(required::<i64>(m, "id").unwrap(), 42);
        assert_eq!(required::<Priority>(m, "priority").unwrap(), Priority::High);
        assert_eq!(required::<String>(m, "reviewer").unwrap(), "");
    }

    #[test]
    fn test_invalid_values_are_rejected_by_parser() {
        for args in [
            vec!["task-tracker", "status", "1", "blocked"],
            vec!["task-tracker", "get", "one"],
            vec!["task-tracker", "add", "1", "-t", "x", "-a", "y", "--due", "soon"],
            vec!["task-tracker", "sort", "title"],
        ] {
            assert!(cli().try_get_matches_from(args).is_err());
        }
    }

    #[test]
    fn test_global_flags_reach_leaf_matches() {
        let matches = cli()
            .try_get_matches_from([
                "task-tracker",
                "--data-file",
                "/tmp/a.json",
                "config",
                "show",
                "--json",
            ])
            .unwrap();
        let leaf = leaf_matches(&matches);
        assert!(leaf.get_flag("json"));
        assert_eq!(
            leaf.get_one::<PathBuf>("data-file"),
            Some(&PathBuf::from("/tmp/a.json"))
        );
    }

    #[test]
    fn test_flag_overrides_config_file() {
        let matches = cli()
            .try_get_matches_from(["task-tracker", "list", "--log-file", "custom.log"])
            .unwrap();
        let mut config = AppConfig::default();
        apply_overrides(&mut config, leaf_matches(&matches));
        assert_eq!(config.log_file, PathBuf::from("custom.log"));
    }
}
