//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local history database.
pub const SCHEMA: &str = r#"
-- Completed lessons, oldest first by id
CREATE TABLE IF NOT EXISTS lesson_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lesson_title TEXT NOT NULL,
    lesson_desc TEXT NOT NULL,
    completed_date_utc TEXT NOT NULL,
    section_index INTEGER NOT NULL,
    lesson_index INTEGER NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_lesson_history_lesson ON lesson_history(section_index, lesson_index);
"#;

/// Record the schema version if not present.
pub const INIT_SCHEMA_VERSION: &str = r#"
INSERT OR IGNORE INTO schema_version (version) VALUES (1);
"#;
