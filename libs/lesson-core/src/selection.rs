//! Per-round selection state machine.
//!
//! A board moves through `Idle -> OneSelected -> Evaluated -> Idle` for every
//! pair the learner picks. Evaluation happens inside the `select` call that
//! completes a pair, so no later input can observe a half-evaluated board.
//! The only deferred part is the incorrect-feedback animation, which the host
//! reports back through [`RoundBoard::finish_incorrect_animation`].

use crate::rounds::ColumnOrdering;
use crate::types::{CardStatus, CardTarget, Column, IndicesPair};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// What happens when a column that already has a pending card is clicked
/// again on a different card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReselectPolicy {
    /// The pending card stays until the pair is evaluated.
    Locked,
    /// The new card replaces the pending one.
    Switch,
}

impl Default for ReselectPolicy {
    fn default() -> Self {
        Self::Locked
    }
}

/// Why a select was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    OutOfRange,
    AlreadyCorrect,
    AlreadyPending,
    ColumnBusy,
    Animating,
    RoundCleared,
    NoActiveRound,
}

/// Result of a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Ignored(IgnoreReason),
    /// The card is now the pending selection of its column.
    Pending(CardTarget),
    Matched { word: String, round_cleared: bool },
    Mismatched { left: usize, right: usize },
}

impl SelectOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Selection, correctness and incorrect-marker state of one round.
#[derive(Debug, Clone)]
pub struct RoundBoard {
    columns: ColumnOrdering,
    policy: ReselectPolicy,
    selection: IndicesPair,
    correct: HashSet<String>,
    incorrect: IndicesPair,
    cleared: bool,
}

impl RoundBoard {
    /// Start a fresh board. Correct words and the incorrect marker always
    /// begin empty for a new column ordering.
    pub fn new(columns: ColumnOrdering, policy: ReselectPolicy) -> Self {
        Self {
            columns,
            policy,
            selection: IndicesPair::EMPTY,
            correct: HashSet::new(),
            incorrect: IndicesPair::EMPTY,
            cleared: false,
        }
    }

    pub fn columns(&self) -> &ColumnOrdering {
        &self.columns
    }

    pub fn selection(&self) -> IndicesPair {
        self.selection
    }

    pub fn incorrect_marker(&self) -> IndicesPair {
        self.incorrect
    }

    pub fn is_correct(&self, word: &str) -> bool {
        self.correct.contains(word)
    }

    pub fn correct_count(&self) -> usize {
        self.correct.len()
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Status of a card, by precedence `correct > selected > incorrect > none`.
    pub fn status(&self, target: CardTarget) -> CardStatus {
        let Some(word) = self.columns.word(target.column, target.index) else {
            return CardStatus::None;
        };

        if self.correct.contains(&word.word) {
            CardStatus::Correct
        } else if self.selection.get(target.column) == Some(target.index) {
            CardStatus::Selected
        } else if self.incorrect.get(target.column) == Some(target.index) {
            CardStatus::Incorrect
        } else {
            CardStatus::None
        }
    }

    /// Click a card.
    pub fn select(&mut self, target: CardTarget) -> SelectOutcome {
        if self.cleared {
            return SelectOutcome::Ignored(IgnoreReason::RoundCleared);
        }

        let Some(word) = self.columns.word(target.column, target.index) else {
            return SelectOutcome::Ignored(IgnoreReason::OutOfRange);
        };
        if self.correct.contains(&word.word) {
            return SelectOutcome::Ignored(IgnoreReason::AlreadyCorrect);
        }

        let pending = self.selection.get(target.column);
        if pending == Some(target.index) {
            return SelectOutcome::Ignored(IgnoreReason::AlreadyPending);
        }
        // The card's feedback animation is still playing.
        if self.status(target) == CardStatus::Incorrect {
            return SelectOutcome::Ignored(IgnoreReason::Animating);
        }
        if pending.is_some() && self.policy == ReselectPolicy::Locked {
            return SelectOutcome::Ignored(IgnoreReason::ColumnBusy);
        }

        self.selection.set(target.column, Some(target.index));
        debug!(column = ?target.column, index = target.index, "card selected");

        match self.selection.complete() {
            Some((left, right)) => self.evaluate(left, right),
            None => SelectOutcome::Pending(target),
        }
    }

    fn evaluate(&mut self, left: usize, right: usize) -> SelectOutcome {
        self.selection = IndicesPair::EMPTY;

        let left_word = &self.columns.left()[left].word;
        let right_word = &self.columns.right()[right].word;

        if left_word == right_word {
            let word = left_word.clone();
            self.correct.insert(word.clone());
            let round_cleared = self.correct.len() == self.columns.len();
            self.cleared = round_cleared;
            debug!(%word, round_cleared, "pair matched");
            SelectOutcome::Matched { word, round_cleared }
        } else {
            self.incorrect = IndicesPair {
                left: Some(left),
                right: Some(right),
            };
            debug!(left, right, "pair mismatched");
            SelectOutcome::Mismatched { left, right }
        }
    }

    /// Report that a card's incorrect animation ended. Clears the marker when
    /// the card is still shown as incorrect; returns whether it did.
    pub fn finish_incorrect_animation(&mut self, target: CardTarget) -> bool {
        if self.status(target) != CardStatus::Incorrect {
            return false;
        }
        self.incorrect = IndicesPair::EMPTY;
        true
    }

    /// Cards on one side of the board, top to bottom.
    pub fn column_len(&self, column: Column) -> usize {
        match column {
            Column::Left => self.columns.left().len(),
            Column::Right => self.columns.right().len(),
        }
    }
}
