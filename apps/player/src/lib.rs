//! Terminal host for the vocabulary lesson engine.
//!
//! Provides:
//! - Player configuration and command-line flags
//! - SQLite history store
//! - History import, export and reset commands
//! - External-program speech
//! - The crossterm front end

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod speech;
pub mod state;
pub mod terminal;

pub use config::PlayerConfig;
pub use state::AppState;
