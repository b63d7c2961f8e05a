//! Round partitioning and column shuffling.

use crate::types::{Column, Word};
use rand::seq::SliceRandom;
use rand::Rng;

/// A bounded group of words played together on one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    words: Vec<Word>,
}

impl Round {
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.word == word)
    }
}

/// Shuffle a lesson's words once and cut them into rounds of `round_size`.
///
/// Every word lands in exactly one round. Only the last round can be short,
/// and no empty round is produced, including when the word count is an exact
/// multiple of `round_size`.
pub fn partition_rounds<R: Rng + ?Sized>(words: &[Word], round_size: usize, rng: &mut R) -> Vec<Round> {
    let mut shuffled = words.to_vec();
    shuffled.shuffle(rng);

    shuffled
        .chunks(round_size.max(1))
        .map(|chunk| Round {
            words: chunk.to_vec(),
        })
        .collect()
}

/// The two independently shuffled columns of the active round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrdering {
    left: Vec<Word>,
    right: Vec<Word>,
}

impl ColumnOrdering {
    /// Shuffle a round into left (prompt) and right (definition) orderings.
    pub fn shuffle<R: Rng + ?Sized>(round: &Round, rng: &mut R) -> Self {
        let mut left = round.words.clone();
        let mut right = round.words.clone();
        left.shuffle(rng);
        right.shuffle(rng);
        Self { left, right }
    }

    /// Build an ordering with a fixed layout.
    pub fn from_columns(left: Vec<Word>, right: Vec<Word>) -> Self {
        debug_assert_eq!(left.len(), right.len());
        Self { left, right }
    }

    pub fn left(&self) -> &[Word] {
        &self.left
    }

    pub fn right(&self) -> &[Word] {
        &self.right
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn word(&self, column: Column, index: usize) -> Option<&Word> {
        match column {
            Column::Left => self.left.get(index),
            Column::Right => self.right.get(index),
        }
    }
}
