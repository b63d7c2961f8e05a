//! Lesson catalog commands.

use super::CommandError;
use lesson_core::Catalog;
use std::fs;
use std::path::Path;
use tracing::info;

/// One row of the lesson picker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LessonSummary {
    pub section_index: usize,
    pub lesson_index: usize,
    pub section_title: String,
    pub title: String,
    pub desc: String,
    pub word_count: usize,
}

/// Read and validate the lesson catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog, CommandError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::new(format!("failed to read catalog {}: {e}", path.display())))?;
    let catalog = Catalog::from_json(&content)?;
    info!(
        path = %path.display(),
        sections = catalog.sections().len(),
        lessons = catalog.lesson_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Every lesson in catalog order.
pub fn list_lessons(catalog: &Catalog) -> Vec<LessonSummary> {
    catalog
        .sections()
        .iter()
        .enumerate()
        .flat_map(|(section_index, section)| {
            section
                .lessons
                .iter()
                .enumerate()
                .map(move |(lesson_index, lesson)| LessonSummary {
                    section_index,
                    lesson_index,
                    section_title: section.title.clone(),
                    title: lesson.title.clone(),
                    desc: lesson.desc.clone(),
                    word_count: lesson.words.len(),
                })
        })
        .collect()
}
