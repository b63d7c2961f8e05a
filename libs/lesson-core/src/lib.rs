//! Core engine for the vocabulary lesson player.
//!
//! Provides:
//! - Round partitioning and per-round column shuffling
//! - The matching board selection state machine
//! - Keyboard shortcut bindings scoped to the live round
//! - The match-game stage and the session that sequences stages
//! - Lesson catalog, history store and speech collaborators
//! - The home-screen tile rotation

pub mod ambient;
pub mod config;
pub mod error;
pub mod history;
pub mod lessons;
pub mod match_game;
pub mod rounds;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod speech;
pub mod stage;
pub mod types;

pub use ambient::{RotationHandle, TileChange, TileRotation, TILE_COUNT};
pub use config::EngineConfig;
pub use error::{CatalogError, ConfigError, HistoryError, LookupError, SessionError};
pub use history::{
    export_file_name, export_history, import_history, parse_history, reset_history, Confirm, HistoryStore,
    MemoryHistory, SharedHistory, RESET_PROMPT,
};
pub use lessons::{Catalog, CatalogSection, LessonLookup};
pub use match_game::{MatchGame, MatchGameFactory};
pub use rounds::{partition_rounds, ColumnOrdering, Round};
pub use selection::{IgnoreReason, ReselectPolicy, RoundBoard, SelectOutcome};
pub use session::{LessonSession, SessionDeps, SessionView};
pub use shortcuts::{KeyboardHub, ShortcutBinding, ShortcutKeys};
pub use speech::{Silent, SpeechError, SpeechOptions, SpeechSynthesizer};
pub use stage::{BoardRow, BoardView, CardView, Stage, StageContext, StageFactory, StageInput};
pub use types::{
    CardStatus, CardTarget, Column, Example, HistoryEntry, IndicesPair, Lesson, Section, StageKind, Word, ROUND_SIZE,
};
