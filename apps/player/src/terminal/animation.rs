//! Pending mismatch-feedback deadlines.
//!
//! Each deadline is tagged with the board generation it was scheduled for.
//! Deadlines for a board that has since been replaced are dropped instead of
//! delivered.

use lesson_core::{BoardView, CardStatus, CardTarget};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deadline {
    generation: u64,
    target: CardTarget,
    at: Instant,
}

#[derive(Debug, Default)]
pub struct AnimationQueue {
    pending: Vec<Deadline>,
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Bring the queue in line with `board`: forget deadlines of older boards
    /// and of cards no longer marked incorrect, then schedule one for every
    /// card that just turned incorrect.
    pub fn sync(&mut self, board: Option<&BoardView>, now: Instant, duration: Duration) {
        let Some(board) = board else {
            self.pending.clear();
            return;
        };

        self.pending.retain(|d| {
            d.generation == board.generation
                && board
                    .card(d.target)
                    .is_some_and(|card| card.status == CardStatus::Incorrect)
        });
        for row in &board.rows {
            for card in [&row.left, &row.right] {
                if card.status != CardStatus::Incorrect {
                    continue;
                }
                let known = self.pending.iter().any(|d| d.target == card.target);
                if !known {
                    self.pending.push(Deadline {
                        generation: board.generation,
                        target: card.target,
                        at: now + duration,
                    });
                }
            }
        }
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|d| d.at).min()
    }

    /// Remove and return targets whose deadline has passed, skipping those
    /// scheduled for a board other than `generation`.
    pub fn take_due(&mut self, now: Instant, generation: Option<u64>) -> Vec<CardTarget> {
        let mut due = Vec::new();
        self.pending.retain(|d| {
            if d.at > now {
                return true;
            }
            if Some(d.generation) == generation {
                due.push(d.target);
            }
            false
        });
        due
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
