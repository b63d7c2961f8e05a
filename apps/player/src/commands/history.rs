//! History import, export and reset.

use super::{lock_repository, CommandError};
use crate::state::AppState;
use chrono::{DateTime, Utc};
use lesson_core::{history, Confirm, HistoryEntry, HistoryError, HistoryStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// All completed lessons, oldest first.
pub fn list_history(state: &AppState) -> Result<Vec<HistoryEntry>, CommandError> {
    let repo = lock_repository(state)?;
    repo.get_all().map_err(Into::into)
}

/// Replace the stored history with the contents of an exported file. A file
/// that fails to parse leaves the history untouched.
pub fn import_history_file(state: &AppState, path: &Path) -> Result<usize, CommandError> {
    let content = fs::read_to_string(path)?;
    let mut repo = lock_repository(state)?;
    let count = history::import_history(&mut *repo, &content)?;
    info!(path = %path.display(), count, "history file imported");
    Ok(count)
}

/// Write the whole history to `<dir>/YYYYMMDD_<prefix>.json` and return the
/// file path.
pub fn export_history_file(state: &AppState, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf, CommandError> {
    let json = {
        let repo = lock_repository(state)?;
        history::export_history(&*repo)?
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(history::export_file_name(&state.config.export_prefix, now));
    fs::write(&path, json)?;
    info!(path = %path.display(), "history exported");
    Ok(path)
}

/// Clear the history if `confirm` approves. Returns whether anything was
/// reset.
pub fn reset_history(state: &AppState, confirm: &mut dyn Confirm) -> Result<bool, CommandError> {
    let mut repo = lock_repository(state)?;
    match history::reset_history(&mut *repo, confirm) {
        Ok(()) => Ok(true),
        Err(HistoryError::ResetNotConfirmed) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
