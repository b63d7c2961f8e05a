//! Test fixtures and factory functions for creating test data.

use chrono::{TimeZone, Utc};
use lesson_core::HistoryEntry;

/// Catalog JSON with `word_counts[i]` words in lesson `i` of the first
/// section, plus an empty second section. Word `w{n}` pairs with `d{n}`.
pub fn catalog_json(word_counts: &[usize]) -> String {
    let lessons: Vec<serde_json::Value> = word_counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let words: Vec<serde_json::Value> = (0..count)
                .map(|n| serde_json::json!({ "word": format!("w{n}"), "desc": format!("d{n}") }))
                .collect();
            serde_json::json!({
                "lessonTitle": format!("Lesson {i}"),
                "lessonDesc": format!("{count} words"),
                "words": words,
            })
        })
        .collect();

    serde_json::json!([
        { "title": "Basics", "lessons": lessons },
        { "title": "Later", "lessons": [] },
    ])
    .to_string()
}

/// A completed-lesson record on the given day of January 2024.
pub fn history_entry(title: &str, day: u32) -> HistoryEntry {
    HistoryEntry {
        lesson_title: title.to_string(),
        lesson_desc: format!("{title} desc"),
        completed_date_utc: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap(),
        section_index: 0,
        lesson_index: 0,
    }
}

/// The import example from the history file format.
pub const IMPORT_ONE_ENTRY: &str = r#"[{"lessonTitle":"A","lessonDesc":"B","completedDateUTC":"2024-01-01T00:00:00Z","sectionIndex":0,"lessonIndex":0}]"#;
