//! Application state.

use crate::config::PlayerConfig;
use crate::db::SqliteRepository;
use lesson_core::Catalog;
use std::sync::{Arc, Mutex};

/// Global application state.
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub catalog: Arc<Catalog>,
    pub config: PlayerConfig,
}

impl AppState {
    pub fn new(repository: SqliteRepository, catalog: Catalog, config: PlayerConfig) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
            catalog: Arc::new(catalog),
            config,
        }
    }
}
