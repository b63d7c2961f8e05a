//! Vocabulary lesson player
//!
//! Main entry point: loads configuration, opens the history database and the
//! lesson catalog, then runs the requested command.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use lesson_core::{Silent, SpeechSynthesizer};
use lesson_player::cli::{Args, Command, HistoryCommand};
use lesson_player::commands::{self, load_catalog};
use lesson_player::config::{default_data_dir, PlayerConfig};
use lesson_player::db::SqliteRepository;
use lesson_player::speech::CommandSpeech;
use lesson_player::terminal;
use lesson_player::AppState;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let mut config = match &args.config {
        Some(path) => PlayerConfig::load_from_file(path)?,
        None => PlayerConfig::load_from_dir(&data_dir)?,
    };
    args.apply(&mut config);
    config.validate()?;

    init_tracing(&config.log_path(&data_dir), args.verbose)?;
    tracing::info!(data_dir = %data_dir.display(), "lesson player starting");

    let repository = SqliteRepository::open(config.database_path(&data_dir))?;
    let catalog = load_catalog(&config.catalog_path(&data_dir))?;
    let speech: Arc<dyn SpeechSynthesizer> = match &config.speech_program {
        Some(program) => Arc::new(CommandSpeech::new(program.clone(), config.speech_voices.clone())),
        None => Arc::new(Silent),
    };
    let state = AppState::new(repository, catalog, config);

    match args.command() {
        Command::Play { section, lesson } => {
            let start = section.zip(lesson);
            terminal::run(state, speech, start).await?;
        }
        Command::Lessons => {
            for lesson in commands::list_lessons(&state.catalog) {
                println!(
                    "{}.{}  {} / {}  ({} words)",
                    lesson.section_index,
                    lesson.lesson_index,
                    lesson.section_title,
                    lesson.title,
                    lesson.word_count
                );
            }
        }
        Command::History { action } => run_history(&state, action)?,
    }

    Ok(())
}

fn run_history(state: &AppState, action: HistoryCommand) -> anyhow::Result<()> {
    match action {
        HistoryCommand::List => {
            for entry in commands::list_history(state)? {
                println!(
                    "{}  {}  (section {}, lesson {})",
                    entry.completed_date_utc.to_rfc3339(),
                    entry.lesson_title,
                    entry.section_index,
                    entry.lesson_index
                );
            }
        }
        HistoryCommand::Export { dir } => {
            let dir = dir.unwrap_or_else(|| state.config.export_dir());
            let path = commands::export_history_file(state, &dir, Utc::now())?;
            println!("Exported history to {}", path.display());
        }
        HistoryCommand::Import { file } => {
            let count = commands::import_history_file(state, &file)?;
            println!("Imported {count} entries from {}", file.display());
        }
        HistoryCommand::Reset { yes } => {
            let mut confirm = |prompt: &str| yes || ask(prompt);
            if commands::reset_history(state, &mut confirm)? {
                println!("History reset");
            } else {
                bail!("history reset cancelled");
            }
        }
    }
    Ok(())
}

/// Ask a yes/no question on the terminal.
fn ask(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

/// Log to a file; the terminal belongs to the player while it runs.
fn init_tracing(path: &Path, verbose: bool) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
