//! Command-line front end for the note store.
//!
//! # Responsibility
//! - Resolve the acting user, store path and logging setup from flags/env.
//! - Map each subcommand onto one `NoteService` use-case.
//! - Print response payloads as pretty JSON on stdout.
//!
//! # Invariants
//! - Every command is scoped to `--user`.
//! - Failures exit non-zero with a single-line message on stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use notestat_core::db::open_db;
use notestat_core::{
    core_version, default_log_level, init_logging, NoteDraft, NoteService, SqliteNoteRepository,
    Tag, DEFAULT_PAGE_SIZE,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notestat", version, about = "Per-user notes with word statistics")]
struct Cli {
    /// SQLite note store path.
    #[arg(long, env = "NOTESTAT_DB", default_value = "notestat.sqlite3", global = true)]
    db: PathBuf,

    /// Acting user id; every command is scoped to it.
    #[arg(long, env = "NOTESTAT_USER", global = true)]
    user: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "NOTESTAT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "NOTESTAT_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a note.
    Create(NoteInput),
    /// Replace title, text and tags of a note.
    Update {
        id: String,
        #[command(flatten)]
        input: NoteInput,
    },
    /// Delete a note.
    Delete { id: String },
    /// List notes newest-first.
    List {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        page: i64,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, allow_negative_numbers = true)]
        size: i64,
        /// Only notes carrying this tag.
        #[arg(long)]
        tag: Option<Tag>,
    },
    /// Print the text of a note.
    Text { id: String },
    /// Print the word-frequency report of a note.
    Stats { id: String },
    /// Print core version.
    Version,
}

#[derive(Debug, Args)]
struct NoteInput {
    #[arg(long)]
    title: String,
    #[arg(long)]
    text: String,
    /// Repeatable: BUSINESS, PERSONAL or IMPORTANT.
    #[arg(long = "tag")]
    tags: Vec<Tag>,
}

impl From<NoteInput> for NoteDraft {
    fn from(input: NoteInput) -> Self {
        NoteDraft::new(input.title, input.text, input.tags)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    if matches!(cli.command, Command::Version) {
        println!("notestat_core version={}", core_version());
        return Ok(());
    }

    let user = cli
        .user
        .context("missing acting user; pass --user or set NOTESTAT_USER")?;
    let mut conn = open_db(&cli.db)
        .with_context(|| format!("failed to open note store `{}`", cli.db.display()))?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let mut service = NoteService::new(repo);

    match cli.command {
        Command::Create(input) => print_json(&service.create_note(&user, input.into())?),
        Command::Update { id, input } => {
            print_json(&service.update_note(&user, &id, input.into())?)
        }
        Command::Delete { id } => {
            service.delete_note(&user, &id)?;
            Ok(())
        }
        Command::List { page, size, tag } => {
            print_json(&service.list_notes(&user, page, size, tag)?)
        }
        Command::Text { id } => print_json(&service.get_note_text(&user, &id)?),
        Command::Stats { id } => print_json(&service.get_note_stats(&user, &id)?),
        Command::Version => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}
