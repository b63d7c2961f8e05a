//! The contract every mini-game of a lesson session implements.
//!
//! A stage is built from a [`StageContext`] holding the lesson and a one-shot
//! [`OnClear`] signal. Firing that signal is the only way a stage reports
//! that it is done.

use crate::config::EngineConfig;
use crate::shortcuts::KeyboardHub;
use crate::speech::SpeechSynthesizer;
use crate::types::{CardStatus, CardTarget, Column, Lesson, StageKind};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Create a connected completion signal and its watcher.
pub fn on_clear_channel() -> (OnClear, ClearWatch) {
    let (tx, rx) = oneshot::channel();
    (
        OnClear { tx: Some(tx) },
        ClearWatch {
            rx,
            cleared: false,
        },
    )
}

/// Stage-side completion signal. Only the first `fire` has an effect.
#[derive(Debug)]
pub struct OnClear {
    tx: Option<oneshot::Sender<()>>,
}

impl OnClear {
    /// Signal completion. Returns `false` if it was already signalled.
    pub fn fire(&mut self) -> bool {
        match self.tx.take() {
            Some(tx) => {
                // The watcher may be gone when the session was torn down first.
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.tx.is_none()
    }
}

/// Orchestrator-side view of a stage's completion signal.
#[derive(Debug)]
pub struct ClearWatch {
    rx: oneshot::Receiver<()>,
    cleared: bool,
}

impl ClearWatch {
    /// Whether the stage has signalled completion.
    pub fn is_cleared(&mut self) -> bool {
        if !self.cleared {
            self.cleared = self.rx.try_recv().is_ok();
        }
        self.cleared
    }
}

/// Everything a stage is built from.
pub struct StageContext {
    pub lesson: Arc<Lesson>,
    pub on_clear: OnClear,
    pub keyboard: KeyboardHub,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub config: EngineConfig,
}

/// Input routed to the active stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageInput {
    /// Pointer click on a card.
    Click(CardTarget),
    /// The card's incorrect-feedback animation finished.
    AnimationEnd(CardTarget),
    /// Key-ups were delivered to the keyboard hub and are waiting to be
    /// taken by the stage's binding.
    ShortcutsPending,
}

/// A playable mini-game.
pub trait Stage {
    fn kind(&self) -> StageKind;

    fn handle(&mut self, input: StageInput);

    /// Card board to render, for stages that show one.
    fn board(&self) -> Option<BoardView> {
        None
    }
}

/// Builds stages of one kind.
pub trait StageFactory {
    fn kind(&self) -> StageKind;

    fn build(&self, context: StageContext) -> Box<dyn Stage>;
}

/// Render snapshot of a card board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Zero-based index of the active round.
    pub round: usize,
    pub round_count: usize,
    /// Changes whenever a new board replaces the old one. Hosts tag deferred
    /// animation callbacks with it and drop callbacks for older boards.
    pub generation: u64,
    pub rows: Vec<BoardRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    pub left: CardView,
    pub right: CardView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub target: CardTarget,
    pub label: String,
    pub shortcut: Option<char>,
    pub status: CardStatus,
}

impl BoardView {
    pub fn card(&self, target: CardTarget) -> Option<&CardView> {
        let row = self.rows.get(target.index)?;
        Some(match target.column {
            Column::Left => &row.left,
            Column::Right => &row.right,
        })
    }
}
