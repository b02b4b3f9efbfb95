//! Thin command layer over the store: argument parsing, path resolution, and
//! console output. One invocation performs exactly one store operation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tasklog::{ListFilter, Result, TaskStore, TasklogError};

const DEFAULT_STORE_FILENAME: &str = ".tasklog.db";

#[derive(Parser)]
#[command(name = "tasklog", version, about = "Single-file append-only task list")]
struct Cli {
    /// Path to the store file (defaults to ~/.tasklog.db).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new, empty store.
    Init,
    /// Append a new task.
    Add {
        /// Task text, at most 4096 bytes.
        text: String,
    },
    /// Print tasks in insertion order.
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Mark a task completed.
    Done {
        /// Id as shown by `list`.
        id: u64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterArg {
    /// Every stored task.
    All,
    /// Skip soft-deleted tasks.
    ExceptDeleted,
    /// Skip soft-deleted and completed tasks.
    Active,
}

impl From<FilterArg> for ListFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::ExceptDeleted => Self::ExceptDeleted,
            FilterArg::Active => Self::OnlyActive,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let path = resolve_store_path(cli.db.clone())?;

    match &cli.command {
        Command::Init => {
            TaskStore::create(&path)?;
            println!("Initialized task store at {}", path.display());
            Ok(())
        }
        Command::Add { text } => {
            let mut store = TaskStore::open(&path)?;
            let entry = store.add(text.as_bytes())?;
            println!("{}: {}", entry.id, entry.text_lossy());
            Ok(())
        }
        Command::List { filter } => {
            let mut store = TaskStore::open_read_only(&path)?;
            for entry in store.list((*filter).into())? {
                let marker = if entry.is_done() { " [done]" } else { "" };
                println!("{}: {}{marker}", entry.id, entry.text_lossy());
            }
            Ok(())
        }
        Command::Done { id } => {
            let mut store = TaskStore::open(&path)?;
            store.mark_done(*id)?;
            println!("Marked {id} as done");
            Ok(())
        }
    }
}

/// Explicit `--db` wins; otherwise the store lives in the home directory. The
/// core never resolves paths itself.
fn resolve_store_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    dirs_next::home_dir()
        .map(|home| home.join(DEFAULT_STORE_FILENAME))
        .ok_or_else(|| TasklogError::Io {
            op: "resolve home directory",
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "home directory could not be determined; pass --db",
            ),
        })
}
