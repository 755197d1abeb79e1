//! Command-line front end for closedlist.
//!
//! # Responsibility
//! - Resolve database/logging configuration from flags and environment.
//! - Map subcommands onto `DayService` operations and print results.
//!
//! # Invariants
//! - No business rules live here; every state change goes through core.

mod render;

use clap::{Parser, Subcommand};
use closedlist_core::db::{open_db, DbError};
use closedlist_core::{
    default_log_level, init_logging, parse_list_date, DayService, ListDateParseError, LoggingError,
    MutationOutcome, RejectReason, RevertOutcome, SqliteKeyValueStore, StoreError, SystemClock,
    Task, TaskId,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

const APP_DIR_NAME: &str = "closedlist";
const DB_FILE_NAME: &str = "closedlist.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "closedlist", version, about = "A daily task list with a closed-list discipline")]
struct Cli {
    /// SQLite database file holding the list state.
    #[arg(long, env = "CLOSEDLIST_DB", global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "CLOSEDLIST_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, env = "CLOSEDLIST_LOG_LEVEL", global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print today's list and the inbox.
    Show,
    /// Append a task to today's list.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Defer a task to tomorrow's inbox.
    Inbox {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Insert an urgent task at the top of today's list.
    Urgent {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Toggle completion by list position (as shown) or id prefix.
    Toggle { task: String },
    /// Archive today and roll unfinished work into the next day.
    EndDay,
    /// Undo the most recent end-day.
    Revert,
    /// Print archived days, newest first.
    History {
        /// Only show the archived entry for this YYYY-MM-DD date.
        #[arg(long)]
        date: Option<String>,
    },
    /// Drop all tasks and history and restart at today's date.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug)]
enum CliError {
    NoDataDir,
    CreateDataDir(std::io::Error),
    Logging(LoggingError),
    Db(DbError),
    Store(StoreError),
    InvalidDate(ListDateParseError),
    TaskLookup(String),
    ResetNotConfirmed,
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "could not determine a data directory; pass --db or set CLOSEDLIST_DB"
            ),
            Self::CreateDataDir(err) => write!(f, "failed to create data directory: {err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::TaskLookup(message) => write!(f, "{message}"),
            Self::ResetNotConfirmed => write!(f, "reset deletes all tasks and history; rerun with --yes"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDataDir(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::InvalidDate(err) => Some(err),
            Self::NoDataDir | Self::TaskLookup(_) | Self::ResetNotConfirmed => None,
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ListDateParseError> for CliError {
    fn from(value: ListDateParseError) -> Self {
        Self::InvalidDate(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())?;
    }

    let db_path = resolve_db_path(cli.db)?;
    let conn = open_db(&db_path)?;
    let kv = SqliteKeyValueStore::try_new(&conn)?;
    let mut service = DayService::new(kv, SystemClock);
    info!(
        "event=cli_command module=cli status=start db_path={}",
        db_path.display()
    );

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => print!("{}", render::live_lists(&service)),
        Command::Add { text } => {
            let outcome = service.add_task(&text.join(" "))?;
            report_added(outcome, "today");
        }
        Command::Inbox { text } => {
            let outcome = service.add_task_to_inbox(&text.join(" "))?;
            report_added(outcome, "the inbox");
        }
        Command::Urgent { text } => {
            let outcome = service.add_urgent_task(&text.join(" "))?;
            report_added(outcome, "the top of today");
        }
        Command::Toggle { task } => {
            let id = resolve_task(service.current_day_tasks(), &task)?;
            if let MutationOutcome::Applied(id) = service.toggle_task(&id)? {
                print!("{}", render::toggled(&service, &id));
            }
        }
        Command::EndDay => {
            let summary = service.end_of_day()?;
            print!("{}", render::rollover_summary(&summary));
            print!("{}", render::live_lists(&service));
        }
        Command::Revert => match service.revert_to_previous_day()? {
            RevertOutcome::Reverted { restored_date } => {
                println!("Reverted to {restored_date}.");
                print!("{}", render::live_lists(&service));
            }
            RevertOutcome::NothingToRevert => println!("No history to revert to."),
        },
        Command::History { date } => match date {
            Some(date) => {
                let date = parse_list_date(&date)?;
                match service.past_list(date) {
                    Some(list) => print!("{}", render::daily_list(list)),
                    None => println!("No archived list for {date}."),
                }
            }
            None => print!("{}", render::history(service.history())),
        },
        Command::Reset { yes } => {
            if !yes {
                return Err(CliError::ResetNotConfirmed);
            }
            service.reset()?;
            println!("All lists reset; today is {}.", service.current_date());
        }
    }

    Ok(())
}

fn resolve_db_path(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let dir = dirs::data_dir()
        .ok_or(CliError::NoDataDir)?
        .join(APP_DIR_NAME);
    std::fs::create_dir_all(&dir).map_err(CliError::CreateDataDir)?;
    Ok(dir.join(DB_FILE_NAME))
}

fn report_added(outcome: MutationOutcome, target: &str) {
    match outcome {
        MutationOutcome::Applied(id) => println!("Added {} to {target}.", render::short_id(&id)),
        MutationOutcome::Rejected(RejectReason::EmptyText) => {
            println!("Nothing added: task text is empty.")
        }
        MutationOutcome::Rejected(RejectReason::TaskNotFound) => {}
    }
}

/// Finds a task in today's list by 1-based position or id prefix.
///
/// A number that is not a valid position is retried as an id prefix.
fn resolve_task(tasks: &[Task], query: &str) -> Result<TaskId, CliError> {
    let query = query.trim();

    if let Ok(position) = query.parse::<usize>() {
        if let Some(task) = position.checked_sub(1).and_then(|index| tasks.get(index)) {
            return Ok(task.id.clone());
        }
    }

    let mut matches = tasks
        .iter()
        .filter(|task| !query.is_empty() && task.id.as_str().starts_with(query));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id.clone()),
        (Some(_), Some(_)) => Err(CliError::TaskLookup(format!(
            "`{query}` matches more than one task; use a longer id prefix"
        ))),
        (None, _) => Err(CliError::TaskLookup(format!(
            "no task in today's list matches `{query}`"
        ))),
    }
}
