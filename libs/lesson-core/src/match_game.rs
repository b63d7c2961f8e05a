//! Matching mini-game: pair each word with its description, round by round.

use crate::config::EngineConfig;
use crate::rounds::{partition_rounds, ColumnOrdering, Round};
use crate::selection::{IgnoreReason, RoundBoard, SelectOutcome};
use crate::shortcuts::{KeyboardHub, ShortcutBinding};
use crate::speech::{SpeechOptions, SpeechSynthesizer};
use crate::stage::{BoardRow, BoardView, CardView, OnClear, Stage, StageContext, StageFactory, StageInput};
use crate::types::{CardTarget, Column, Lesson, StageKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The active round's board together with its key binding. Dropping it tears
/// the round down.
struct ActiveRound {
    board: RoundBoard,
    binding: ShortcutBinding,
}

/// Match-game controller for one lesson.
pub struct MatchGame {
    lesson: Arc<Lesson>,
    rounds: Vec<Round>,
    round_index: usize,
    active: Option<ActiveRound>,
    generation: u64,
    keyboard: KeyboardHub,
    speech: Arc<dyn SpeechSynthesizer>,
    config: EngineConfig,
    on_clear: OnClear,
    rng: StdRng,
}

impl MatchGame {
    /// Partition the lesson and show the first round. A lesson without words
    /// clears immediately.
    pub fn new(context: StageContext, rng: StdRng) -> Self {
        let StageContext {
            lesson,
            on_clear,
            keyboard,
            speech,
            config,
        } = context;

        let mut game = Self {
            lesson,
            rounds: Vec::new(),
            round_index: 0,
            active: None,
            generation: 0,
            keyboard,
            speech,
            config,
            on_clear,
            rng,
        };

        game.rounds = partition_rounds(&game.lesson.words, game.config.round_size, &mut game.rng);
        info!(
            lesson = %game.lesson.title,
            words = game.lesson.words.len(),
            rounds = game.rounds.len(),
            "match game started"
        );

        if game.rounds.is_empty() {
            game.finish();
        } else {
            game.start_round(0);
        }
        game
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// The active round's board, if a round is on screen.
    pub fn round_board(&self) -> Option<&RoundBoard> {
        self.active.as_ref().map(|active| &active.board)
    }

    pub fn is_cleared(&self) -> bool {
        self.on_clear.has_fired()
    }

    /// Click a card on the active board.
    pub fn click(&mut self, target: CardTarget) -> SelectOutcome {
        let Some(active) = self.active.as_mut() else {
            return SelectOutcome::Ignored(IgnoreReason::NoActiveRound);
        };

        let outcome = active.board.select(target);
        if outcome.is_accepted() && target.column == Column::Left {
            let word = active.board.columns().left()[target.index].word.clone();
            self.speak(&word);
        }

        if let SelectOutcome::Matched {
            round_cleared: true,
            ..
        } = outcome
        {
            self.advance();
        }
        outcome
    }

    /// Apply every shortcut key delivered since the last call, as clicks.
    pub fn apply_shortcuts(&mut self) {
        let targets = match self.active.as_ref() {
            Some(active) => active.binding.drain(),
            None => return,
        };
        let generation = self.generation;
        for target in targets {
            // Keys queued for a board that has since been replaced are dropped.
            if self.generation != generation {
                break;
            }
            debug!(?target, "shortcut pressed");
            self.click(target);
        }
    }

    /// Report that a card's incorrect animation finished.
    pub fn animation_end(&mut self, target: CardTarget) -> bool {
        self.active
            .as_mut()
            .is_some_and(|active| active.board.finish_incorrect_animation(target))
    }

    /// Render snapshot of the active board.
    pub fn view(&self) -> Option<BoardView> {
        let active = self.active.as_ref()?;
        let board = &active.board;
        let columns = board.columns();
        let keys = &self.config.shortcuts;

        let rows = (0..columns.len())
            .map(|index| {
                let left = CardTarget::left(index);
                let right = CardTarget::right(index);
                BoardRow {
                    left: CardView {
                        target: left,
                        label: columns.left()[index].word.clone(),
                        shortcut: keys.key_for(left),
                        status: board.status(left),
                    },
                    right: CardView {
                        target: right,
                        label: columns.right()[index].desc.clone(),
                        shortcut: keys.key_for(right),
                        status: board.status(right),
                    },
                }
            })
            .collect();

        Some(BoardView {
            round: self.round_index,
            round_count: self.rounds.len(),
            generation: self.generation,
            rows,
        })
    }

    fn start_round(&mut self, index: usize) {
        // Release the previous round's key binding before binding again.
        self.active = None;
        self.round_index = index;
        self.generation += 1;

        let columns = ColumnOrdering::shuffle(&self.rounds[index], &mut self.rng);
        let binding = self.keyboard.bind(self.config.shortcuts.clone());
        self.active = Some(ActiveRound {
            board: RoundBoard::new(columns, self.config.reselect),
            binding,
        });
        debug!(round = index, of = self.rounds.len(), "round started");
    }

    fn advance(&mut self) {
        info!(round = self.round_index, "round cleared");
        let next = self.round_index + 1;
        if next < self.rounds.len() {
            self.start_round(next);
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.active = None;
        if self.on_clear.fire() {
            info!(lesson = %self.lesson.title, "match game cleared");
        }
    }

    fn speak(&self, text: &str) {
        let options = SpeechOptions {
            random_voice: self.config.random_voice,
        };
        if let Err(err) = self.speech.speak(text, options) {
            warn!(error = %err, text, "speech synthesis failed");
        }
    }
}

impl Stage for MatchGame {
    fn kind(&self) -> StageKind {
        StageKind::Match
    }

    fn handle(&mut self, input: StageInput) {
        match input {
            StageInput::Click(target) => {
                self.click(target);
            }
            StageInput::AnimationEnd(target) => {
                self.animation_end(target);
            }
            StageInput::ShortcutsPending => self.apply_shortcuts(),
        }
    }

    fn board(&self) -> Option<BoardView> {
        self.view()
    }
}

/// Builds [`MatchGame`] stages.
#[derive(Debug, Clone, Default)]
pub struct MatchGameFactory {
    seed: Option<u64>,
}

impl MatchGameFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed shuffle seed (replays and tests).
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl StageFactory for MatchGameFactory {
    fn kind(&self) -> StageKind {
        StageKind::Match
    }

    fn build(&self, context: StageContext) -> Box<dyn Stage> {
        let seed = self.seed.unwrap_or_else(rand::random);
        Box::new(MatchGame::new(context, StdRng::seed_from_u64(seed)))
    }
}
