//! Lesson history collaborator, plus JSON import/export and guarded reset.

use crate::error::HistoryError;
use crate::types::HistoryEntry;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Prompt shown before history is wiped.
pub const RESET_PROMPT: &str = "Do you really want to reset all the data? It cannot be restored.";

/// Persistent record of completed lessons.
pub trait HistoryStore {
    fn add(&mut self, entry: HistoryEntry) -> Result<(), HistoryError>;
    fn get_all(&self) -> Result<Vec<HistoryEntry>, HistoryError>;
    fn replace_all(&mut self, entries: Vec<HistoryEntry>) -> Result<(), HistoryError>;
    fn clear_all(&mut self) -> Result<(), HistoryError>;
}

/// History store shared between a session and the host's data commands.
pub type SharedHistory = Arc<Mutex<dyn HistoryStore + Send>>;

/// In-process history, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn add(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        self.entries.push(entry);
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.entries.clone())
    }

    fn replace_all(&mut self, entries: Vec<HistoryEntry>) -> Result<(), HistoryError> {
        self.entries = entries;
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        Ok(())
    }
}

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Parse an exported history file. Fails on the first malformed record.
pub fn parse_history(json: &str) -> Result<Vec<HistoryEntry>, HistoryError> {
    serde_json::from_str(json).map_err(HistoryError::InvalidImport)
}

/// Replace the whole history with the contents of an exported file. On any
/// parse error the store is left untouched.
pub fn import_history(store: &mut dyn HistoryStore, json: &str) -> Result<usize, HistoryError> {
    let entries = match parse_history(json) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "history import rejected");
            return Err(err);
        }
    };
    let count = entries.len();
    store.replace_all(entries)?;
    info!(count, "history imported");
    Ok(count)
}

/// Serialize the whole history as a JSON array.
pub fn export_history(store: &dyn HistoryStore) -> Result<String, HistoryError> {
    let entries = store.get_all()?;
    serde_json::to_string(&entries).map_err(HistoryError::Serialize)
}

/// File name for an export made at `now`, e.g. `20240101_vocab-history.json`.
pub fn export_file_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}.json", now.format("%Y%m%d"), prefix)
}

/// Clear the history once the user has confirmed.
pub fn reset_history(store: &mut dyn HistoryStore, confirm: &mut dyn Confirm) -> Result<(), HistoryError> {
    if !confirm.confirm(RESET_PROMPT) {
        return Err(HistoryError::ResetNotConfirmed);
    }
    store.clear_all()?;
    info!("history reset");
    Ok(())
}
