//! Core types for the lesson game engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of words presented together in one matching round.
pub const ROUND_SIZE: usize = 5;

/// Example sentence attached to a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub sentence: String,
    pub translation: String,
}

/// A vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub desc: String,
    #[serde(default)]
    pub examples: Vec<Example>,
}

impl Word {
    /// Create a word without example sentences.
    pub fn new(word: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            desc: desc.into(),
            examples: Vec::new(),
        }
    }
}

/// A lesson and its ordered word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(alias = "lessonTitle")]
    pub title: String,
    #[serde(alias = "lessonDesc")]
    pub desc: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// A group of lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(alias = "sectionTitle")]
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// One of the two card groups on a matching board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Prompt words.
    Left,
    /// Definitions.
    Right,
}

/// Position of a card on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardTarget {
    pub column: Column,
    pub index: usize,
}

impl CardTarget {
    pub fn left(index: usize) -> Self {
        Self {
            column: Column::Left,
            index,
        }
    }

    pub fn right(index: usize) -> Self {
        Self {
            column: Column::Right,
            index,
        }
    }
}

/// Optional left/right indices, used for both the pending selection and the
/// incorrect marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndicesPair {
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl IndicesPair {
    pub const EMPTY: Self = Self {
        left: None,
        right: None,
    };

    pub fn get(&self, column: Column) -> Option<usize> {
        match column {
            Column::Left => self.left,
            Column::Right => self.right,
        }
    }

    pub fn set(&mut self, column: Column, index: Option<usize>) {
        match column {
            Column::Left => self.left = index,
            Column::Right => self.right = index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Both indices, if both are set.
    pub fn complete(&self) -> Option<(usize, usize)> {
        match (self.left, self.right) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }
}

/// Visual status of a card, derived at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    None,
    Selected,
    Correct,
    Incorrect,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::None
    }
}

/// Mini-game kinds a lesson session can be composed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Match,
    BlankFill,
    TranslationPuzzle,
}

impl StageKind {
    /// Get the stage name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::BlankFill => "blank_fill",
            Self::TranslationPuzzle => "translation_puzzle",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "match" => Some(Self::Match),
            "blank_fill" => Some(Self::BlankFill),
            "translation_puzzle" => Some(Self::TranslationPuzzle),
            _ => None,
        }
    }
}

/// Record of one completed lesson session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub lesson_title: String,
    pub lesson_desc: String,
    #[serde(
        rename = "completedDateUTC",
        alias = "completedDate",
        with = "completed_date"
    )]
    pub completed_date_utc: DateTime<Utc>,
    pub section_index: usize,
    pub lesson_index: usize,
}

impl HistoryEntry {
    pub fn new(
        lesson: &Lesson,
        section_index: usize,
        lesson_index: usize,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            lesson_title: lesson.title.clone(),
            lesson_desc: lesson.desc.clone(),
            completed_date_utc: completed_at,
            section_index,
            lesson_index,
        }
    }
}

/// Completion timestamps are written as RFC 3339 with a `Z` suffix. Older
/// exports used the RFC 2822 form (`Mon, 01 Jan 2024 00:00:00 GMT`), which is
/// still accepted on read.
pub(crate) mod completed_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid completion date: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }
}
