//! CLI entry point for doneit.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use doneit_app::{ProjectConfig, SessionProvider, StaticSession, TaskCoordinator, resolve_owner};
use doneit_core::{OwnerId, TaskBoard};
use doneit_store_json::JsonStore;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod view;

/// Personal task lists kept in a JSON file.
#[derive(Parser, Debug)]
#[command(
    name = "doneit",
    version,
    about = "doneit: prioritised task lists split into to-do and done"
)]
struct Cli {
    /// Project directory holding `.doneit/` (defaults to current).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Act as this owner instead of DONEIT_OWNER / session.owner.
    #[arg(long)]
    owner: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks of one partition, highest priority first.
    Ls {
        /// Show completed tasks instead of open ones.
        #[arg(long)]
        completed: bool,
        /// Only show this priority (High, Medium or Low).
        #[arg(short = 'p', long)]
        priority: Option<String>,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Create a task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(short = 'p', long, default_value = "Medium")]
        priority: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date as dd-MM-yyyy.
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },

    /// Change fields of an existing task.
    Edit {
        #[arg(long)]
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short = 'p', long)]
        priority: Option<String>,
        /// New description; an empty value clears it.
        #[arg(long)]
        description: Option<String>,
        /// New due date as dd-MM-yyyy; an empty value clears it.
        #[arg(long)]
        due: Option<String>,
        /// New location; an empty value clears it.
        #[arg(long)]
        location: Option<String>,
    },

    /// Flip a task between open and completed.
    Done {
        #[arg(long)]
        task: String,
    },

    /// Delete a task.
    Rm {
        #[arg(long)]
        task: String,
    },

    /// Print one task as JSON.
    Show {
        #[arg(long)]
        task: String,
    },

    /// Store every owned task from a JSON array file in one batch.
    Import {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli { dir, owner, cmd } = Cli::parse();
    install_tracing();

    let workdir = dir.unwrap_or_else(|| PathBuf::from("."));
    let config = ProjectConfig::from_workdir(&workdir)?;
    let session = session_for(owner, &config);
    debug!(owner = ?session.current_owner_id(), store = %config.store_path().display(), "Resolved session");

    let store = JsonStore::open(config.store_path())?;
    let mut board = TaskBoard::new();
    board.select_partition(config.view.partition);
    let coordinator = TaskCoordinator::with_board(store, session, board);

    tokio::runtime::Runtime::new()?.block_on(async {
        let mut stdout = io::stdout().lock();
        commands::run(cmd, &coordinator, &config.view, &mut stdout).await
    })
}

fn session_for(flag: Option<String>, config: &ProjectConfig) -> StaticSession {
    flag.filter(|owner| !owner.trim().is_empty())
        .map(|owner| OwnerId::new(owner.trim()))
        .or_else(|| resolve_owner(&config.session))
        .map_or_else(StaticSession::anonymous, StaticSession::signed_in)
}

fn install_tracing() {
    // RUST_LOG overrides; INFO otherwise. Logs go to stderr so stdout stays parseable.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
