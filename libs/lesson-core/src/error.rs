//! Error types for lesson-core.

use crate::types::Column;
use thiserror::Error;

/// Errors from resolving a lesson by its indices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("section {section} not found")]
    SectionNotFound { section: usize },

    #[error("lesson {lesson} not found in section {section}")]
    LessonNotFound { section: usize, lesson: usize },
}

/// Errors that can occur while loading a lesson catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate word {word:?} in section {section}, lesson {lesson}")]
    DuplicateWord {
        section: usize,
        lesson: usize,
        word: String,
    },
}

/// Errors from the history collaborator and its import/export helpers.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid history file: {0}")]
    InvalidImport(#[source] serde_json::Error),

    #[error("failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("history reset was not confirmed")]
    ResetNotConfirmed,

    #[error("history store lock poisoned")]
    Poisoned,

    #[error("history storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("round size must be at least 1")]
    ZeroRoundSize,

    #[error("{column:?} column has {got} shortcut keys, round size needs {needed}")]
    TooFewShortcuts {
        column: Column,
        needed: usize,
        got: usize,
    },

    #[error("shortcut key {0:?} is bound more than once")]
    DuplicateShortcut(char),

    #[error("unknown stage {0:?}")]
    UnknownStage(String),

    #[error("a session needs at least one stage")]
    NoStages,
}

/// Errors surfaced by the session orchestrator.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to record lesson completion: {0}")]
    History(#[from] HistoryError),
}
