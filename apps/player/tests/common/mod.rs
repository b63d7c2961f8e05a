//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext with an in-memory history database and a catalog
//! - A scratch directory that is removed when the context drops

#![allow(dead_code)]

pub mod fixtures;

use std::path::{Path, PathBuf};

use lesson_core::{Catalog, HistoryEntry};
use lesson_player::commands::load_catalog;
use lesson_player::config::PlayerConfig;
use lesson_player::db::{HistoryRepository, SqliteRepository};
use lesson_player::AppState;
use uuid::Uuid;

/// Test context with app state backed by an in-memory database.
pub struct TestContext {
    pub state: AppState,
    dir: PathBuf,
}

impl TestContext {
    /// Create a context whose catalog holds lessons with the given word
    /// counts.
    pub fn new(word_counts: &[usize]) -> Self {
        Self::with_config(word_counts, PlayerConfig::default())
    }

    pub fn with_config(word_counts: &[usize], config: PlayerConfig) -> Self {
        let dir = std::env::temp_dir().join(format!("lesson-player-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("Failed to create scratch directory");

        let catalog_path = dir.join("lessons.json");
        std::fs::write(&catalog_path, fixtures::catalog_json(word_counts)).expect("Failed to write catalog");
        let catalog: Catalog = load_catalog(&catalog_path).expect("Failed to load catalog");

        let repository = SqliteRepository::open_in_memory().expect("Failed to open database");
        Self {
            state: AppState::new(repository, catalog, config),
            dir,
        }
    }

    /// Scratch directory for files a test reads or writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn seed_history(&self, entries: &[HistoryEntry]) {
        let repo = self.state.repository.lock().unwrap();
        for entry in entries {
            repo.insert_entry(entry).expect("Failed to insert history");
        }
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.repository.lock().unwrap().list_entries().unwrap()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
