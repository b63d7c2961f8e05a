//! Commands the front ends call into.

pub mod history;
pub mod lessons;
pub mod play;

pub use history::{export_history_file, import_history_file, list_history, reset_history};
pub use lessons::{list_lessons, load_catalog, LessonSummary};
pub use play::{new_session, stage_factories};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<lesson_core::HistoryError> for CommandError {
    fn from(e: lesson_core::HistoryError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<lesson_core::CatalogError> for CommandError {
    fn from(e: lesson_core::CatalogError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<lesson_core::SessionError> for CommandError {
    fn from(e: lesson_core::SessionError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        Self { message: e.to_string() }
    }
}

/// Lock the history store, turning a poisoned lock into a command error.
pub(crate) fn lock_repository(
    state: &crate::state::AppState,
) -> Result<std::sync::MutexGuard<'_, crate::db::SqliteRepository>, CommandError> {
    state
        .repository
        .lock()
        .map_err(|_| CommandError::from(lesson_core::HistoryError::Poisoned))
}
