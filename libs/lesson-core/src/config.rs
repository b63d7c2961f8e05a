//! Engine configuration.

use crate::error::ConfigError;
use crate::selection::ReselectPolicy;
use crate::shortcuts::ShortcutKeys;
use crate::types::{StageKind, ROUND_SIZE};
use serde::{Deserialize, Serialize};

const fn default_round_size() -> usize {
    ROUND_SIZE
}

const fn default_true() -> bool {
    true
}

fn default_stages() -> Vec<StageKind> {
    vec![StageKind::Match]
}

/// Tuning for the matching game and the stage sequence of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Words per round.
    #[serde(default = "default_round_size")]
    pub round_size: usize,

    #[serde(default)]
    pub shortcuts: ShortcutKeys,

    #[serde(default)]
    pub reselect: ReselectPolicy,

    /// Speak selected words with a random voice.
    #[serde(default = "default_true")]
    pub random_voice: bool,

    /// Mini-games played in order for each lesson.
    #[serde(default = "default_stages")]
    pub stages: Vec<StageKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_size: default_round_size(),
            shortcuts: ShortcutKeys::default(),
            reselect: ReselectPolicy::default(),
            random_voice: default_true(),
            stages: default_stages(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_size == 0 {
            return Err(ConfigError::ZeroRoundSize);
        }
        if self.stages.is_empty() {
            return Err(ConfigError::NoStages);
        }
        self.shortcuts.validate(self.round_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.round_size, 5);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"roundSize": 3, "reselect": "switch"}"#).unwrap();
        assert_eq!(config.round_size, 3);
        assert_eq!(config.reselect, ReselectPolicy::Switch);
        assert_eq!(config.shortcuts, ShortcutKeys::default());
        assert_eq!(config.stages, vec![StageKind::Match]);
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let config = EngineConfig {
            round_size: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroRoundSize));

        let config = EngineConfig {
            stages: vec![],
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoStages));
    }
}
