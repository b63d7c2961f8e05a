//! Command-line interface.

use crate::config::PlayerConfig;
use clap::{Parser, Subcommand};
use lesson_core::StageKind;
use std::path::PathBuf;

/// Vocabulary lesson player
///
/// Plays lessons from a catalog in the terminal and keeps a history of the
/// lessons you complete.
#[derive(Parser, Debug)]
#[command(name = "lesson-player")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file (default: config.json in the data directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data directory for the database, log and default catalog
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Lesson catalog JSON file
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// History database file
    #[arg(long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Log file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Mismatch feedback duration in milliseconds
    #[arg(long, value_name = "MS")]
    pub animation_ms: Option<u64>,

    /// External speech program
    #[arg(long, value_name = "PROGRAM")]
    pub speech_program: Option<String>,

    /// Prefix for exported history files
    #[arg(long, value_name = "PREFIX")]
    pub export_prefix: Option<String>,

    /// Stage to play, in order (repeatable)
    #[arg(long = "stage", value_name = "KIND", value_parser = parse_stage)]
    pub stages: Vec<StageKind>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the player (default)
    Play {
        /// Start straight into this section
        #[arg(long, requires = "lesson")]
        section: Option<usize>,

        /// Start straight into this lesson of the section
        #[arg(long, requires = "section")]
        lesson: Option<usize>,
    },
    /// List the lessons in the catalog
    Lessons,
    /// Manage lesson history
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommand {
    /// Print completed lessons
    List,
    /// Write the history to a dated JSON file
    Export {
        /// Target directory (default: exportDir from the config)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Replace the history with an exported file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Delete all history
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn parse_stage(raw: &str) -> Result<StageKind, String> {
    StageKind::from_str(raw).ok_or_else(|| format!("unknown stage {raw:?}"))
}

impl Args {
    /// Apply flags on top of the file configuration.
    pub fn apply(&self, config: &mut PlayerConfig) {
        if let Some(path) = &self.catalog {
            config.catalog_path = Some(path.clone());
        }
        if let Some(path) = &self.database {
            config.database_path = Some(path.clone());
        }
        if let Some(path) = &self.log_file {
            config.log_path = Some(path.clone());
        }
        if let Some(ms) = self.animation_ms {
            config.animation_ms = ms;
        }
        if let Some(program) = &self.speech_program {
            config.speech_program = Some(program.clone());
        }
        if let Some(prefix) = &self.export_prefix {
            config.export_prefix = prefix.clone();
        }
        if !self.stages.is_empty() {
            config.engine.stages = self.stages.clone();
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Play {
            section: None,
            lesson: None,
        })
    }
}
