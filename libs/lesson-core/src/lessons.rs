//! Lesson catalog and lookup by section/lesson index.

use crate::error::{CatalogError, LookupError};
use crate::types::{Lesson, Section};
use std::collections::HashSet;
use std::sync::Arc;

/// Resolves a lesson from its section and lesson indices.
pub trait LessonLookup {
    fn resolve(&self, section: usize, lesson: usize) -> Result<Arc<Lesson>, LookupError>;
}

/// A section whose lessons are shared with running sessions.
#[derive(Debug, Clone)]
pub struct CatalogSection {
    pub title: String,
    pub lessons: Vec<Arc<Lesson>>,
}

/// All lessons the product ships, grouped by section.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sections: Vec<CatalogSection>,
}

impl Catalog {
    /// Build a catalog, rejecting lessons that repeat a word.
    pub fn new(sections: Vec<Section>) -> Result<Self, CatalogError> {
        let mut built = Vec::with_capacity(sections.len());

        for (section_index, section) in sections.into_iter().enumerate() {
            for (lesson_index, lesson) in section.lessons.iter().enumerate() {
                let mut seen = HashSet::new();
                if let Some(dup) = lesson.words.iter().find(|w| !seen.insert(w.word.as_str())) {
                    return Err(CatalogError::DuplicateWord {
                        section: section_index,
                        lesson: lesson_index,
                        word: dup.word.clone(),
                    });
                }
            }

            built.push(CatalogSection {
                title: section.title,
                lessons: section.lessons.into_iter().map(Arc::new).collect(),
            });
        }

        Ok(Self { sections: built })
    }

    /// Parse a catalog from a JSON array of sections.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let sections: Vec<Section> = serde_json::from_str(json)?;
        Self::new(sections)
    }

    pub fn sections(&self) -> &[CatalogSection] {
        &self.sections
    }

    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }
}

impl LessonLookup for Catalog {
    fn resolve(&self, section: usize, lesson: usize) -> Result<Arc<Lesson>, LookupError> {
        let found = self
            .sections
            .get(section)
            .ok_or(LookupError::SectionNotFound { section })?;
        found
            .lessons
            .get(lesson)
            .cloned()
            .ok_or(LookupError::LessonNotFound { section, lesson })
    }
}
