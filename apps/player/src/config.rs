//! Player configuration.
//!
//! Read from a JSON file in the data directory. Every field is optional;
//! missing fields fall back to the defaults below and command-line flags
//! override whatever the file says.

use lesson_core::{ConfigError, EngineConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "lesson-player";

const CONFIG_FILE_NAME: &str = "config.json";

const fn default_animation_ms() -> u64 {
    600
}

fn default_export_prefix() -> String {
    "vocab-history".to_string()
}

#[derive(Debug, Error)]
pub enum PlayerConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid engine settings: {0}")]
    Engine(#[from] ConfigError),

    #[error("animation duration must be greater than 0")]
    ZeroAnimation,

    #[error("export prefix must not be empty")]
    EmptyExportPrefix,
}

/// Host settings plus the engine settings it passes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Lesson catalog JSON. Defaults to `lessons.json` in the data directory.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// History database. Defaults to `history.db` in the data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Log file. Defaults to `player.log` in the data directory.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// How long a mismatched pair shows its feedback before it can be picked
    /// again, in milliseconds.
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,

    /// External speech program, invoked as `program [-v voice] text`. No
    /// program means no speech.
    #[serde(default)]
    pub speech_program: Option<String>,

    /// Voices to pick from when a random voice is requested.
    #[serde(default)]
    pub speech_voices: Vec<String>,

    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,

    /// Where exports are written. Defaults to the working directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            database_path: None,
            log_path: None,
            animation_ms: default_animation_ms(),
            speech_program: None,
            speech_voices: Vec::new(),
            export_prefix: default_export_prefix(),
            export_dir: None,
            engine: EngineConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Load `config.json` from the data directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self, PlayerConfigError> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, PlayerConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PlayerConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| PlayerConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), PlayerConfigError> {
        if self.animation_ms == 0 {
            return Err(PlayerConfigError::ZeroAnimation);
        }
        if self.export_prefix.trim().is_empty() {
            return Err(PlayerConfigError::EmptyExportPrefix);
        }
        self.engine.validate()?;
        Ok(())
    }

    pub fn catalog_path(&self, data_dir: &Path) -> PathBuf {
        self.catalog_path
            .clone()
            .unwrap_or_else(|| data_dir.join("lessons.json"))
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_dir.join("history.db"))
    }

    pub fn log_path(&self, data_dir: &Path) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| data_dir.join("player.log"))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Platform data directory for the player, falling back to the working
/// directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
