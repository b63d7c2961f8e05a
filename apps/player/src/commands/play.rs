//! Session construction.

use super::CommandError;
use crate::state::AppState;
use lesson_core::{
    EngineConfig, KeyboardHub, LessonSession, MatchGameFactory, SessionDeps, SpeechSynthesizer, StageFactory,
    StageKind,
};
use std::sync::Arc;

/// Factories for the configured stage list, in order. Only the matching game
/// ships with this player.
pub fn stage_factories(kinds: &[StageKind]) -> Result<Vec<Box<dyn StageFactory>>, CommandError> {
    kinds
        .iter()
        .map(|kind| match kind {
            StageKind::Match => Ok(Box::new(MatchGameFactory::new()) as Box<dyn StageFactory>),
            other => Err(CommandError::new(format!(
                "stage {} is not available in this player",
                other.as_str()
            ))),
        })
        .collect()
}

/// Build an idle session wired to the app's catalog and history.
pub fn new_session(
    state: &AppState,
    keyboard: KeyboardHub,
    speech: Arc<dyn SpeechSynthesizer>,
) -> Result<LessonSession, CommandError> {
    let config: EngineConfig = state.config.engine.clone();
    let factories = stage_factories(&config.stages)?;
    let deps = SessionDeps {
        lookup: state.catalog.clone(),
        history: state.repository.clone(),
        speech,
        keyboard,
    };
    Ok(LessonSession::new(deps, factories, config))
}
