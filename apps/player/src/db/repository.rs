//! Repository pattern for database access.

use crate::db::date_utils::{format_utc, parse_utc};
use crate::db::error::DbError;
use lesson_core::{HistoryEntry, HistoryError, HistoryStore};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for completed-lesson history.
pub trait HistoryRepository {
    fn insert_entry(&self, entry: &HistoryEntry) -> Result<i64>;
    fn list_entries(&self) -> Result<Vec<HistoryEntry>>;
    fn replace_entries(&mut self, entries: &[HistoryEntry]) -> Result<usize>;
    fn delete_all_entries(&self) -> Result<usize>;
    fn count_entries(&self) -> Result<usize>;
}

/// SQLite-backed repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i32> {
        let version = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
        Ok(version)
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<(String, String, String, i64, i64)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    }

    fn decode_entry(raw: (String, String, String, i64, i64)) -> Result<HistoryEntry> {
        let (lesson_title, lesson_desc, completed, section, lesson) = raw;
        let completed_date_utc = parse_utc(&completed)
            .ok_or_else(|| DbError::InvalidData(format!("bad completion date: {completed}")))?;
        let section_index = usize::try_from(section)
            .map_err(|_| DbError::InvalidData(format!("bad section index: {section}")))?;
        let lesson_index = usize::try_from(lesson)
            .map_err(|_| DbError::InvalidData(format!("bad lesson index: {lesson}")))?;

        Ok(HistoryEntry {
            lesson_title,
            lesson_desc,
            completed_date_utc,
            section_index,
            lesson_index,
        })
    }
}

fn insert(conn: &Connection, entry: &HistoryEntry) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO lesson_history (lesson_title, lesson_desc, completed_date_utc, section_index, lesson_index) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.lesson_title,
            entry.lesson_desc,
            format_utc(entry.completed_date_utc),
            entry.section_index as i64,
            entry.lesson_index as i64,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl HistoryRepository for SqliteRepository {
    fn insert_entry(&self, entry: &HistoryEntry) -> Result<i64> {
        let id = insert(&self.conn, entry)?;
        info!(id, lesson = %entry.lesson_title, "history entry stored");
        Ok(id)
    }

    fn list_entries(&self) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT lesson_title, lesson_desc, completed_date_utc, section_index, lesson_index FROM lesson_history ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(Self::decode_entry).collect()
    }

    fn replace_entries(&mut self, entries: &[HistoryEntry]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM lesson_history", [])?;
        for entry in entries {
            insert(&tx, entry)?;
        }
        tx.commit()?;
        Ok(entries.len())
    }

    fn delete_all_entries(&self) -> Result<usize> {
        let count = self.conn.execute("DELETE FROM lesson_history", [])?;
        Ok(count)
    }

    fn count_entries(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lesson_history", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl From<DbError> for HistoryError {
    fn from(e: DbError) -> Self {
        HistoryError::Storage(Box::new(e))
    }
}

impl HistoryStore for SqliteRepository {
    fn add(&mut self, entry: HistoryEntry) -> std::result::Result<(), HistoryError> {
        self.insert_entry(&entry)?;
        Ok(())
    }

    fn get_all(&self) -> std::result::Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.list_entries()?)
    }

    fn replace_all(&mut self, entries: Vec<HistoryEntry>) -> std::result::Result<(), HistoryError> {
        self.replace_entries(&entries)?;
        Ok(())
    }

    fn clear_all(&mut self) -> std::result::Result<(), HistoryError> {
        self.delete_all_entries()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn entry(title: &str, day: u32) -> HistoryEntry {
        HistoryEntry {
            lesson_title: title.to_string(),
            lesson_desc: format!("{title} desc"),
            completed_date_utc: Utc.with_ymd_and_hms(2024, 2, day, 8, 30, 0).unwrap(),
            section_index: 1,
            lesson_index: 2,
        }
    }

    #[test]
    fn test_fresh_database_is_empty() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.count_entries().unwrap(), 0);
        assert_eq!(repo.schema_version().unwrap(), crate::db::schema::SCHEMA_VERSION);
    }

    #[test]
    fn test_entries_come_back_in_insertion_order() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.insert_entry(&entry("b", 2)).unwrap();
        repo.insert_entry(&entry("a", 1)).unwrap();

        assert_eq!(repo.list_entries().unwrap(), vec![entry("b", 2), entry("a", 1)]);
    }

    #[test]
    fn test_replace_swaps_everything() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        repo.insert_entry(&entry("old", 1)).unwrap();

        let replaced = repo.replace_entries(&[entry("x", 3), entry("y", 4)]).unwrap();
        assert_eq!(replaced, 2);
        assert_eq!(repo.list_entries().unwrap(), vec![entry("x", 3), entry("y", 4)]);
    }

    #[test]
    fn test_history_store_contract() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let store: &mut dyn HistoryStore = &mut repo;

        store.add(entry("one", 5)).unwrap();
        assert_eq!(store.get_all().unwrap(), vec![entry("one", 5)]);

        store.clear_all().unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_row_is_reported() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.conn
            .execute(
                "INSERT INTO lesson_history (lesson_title, lesson_desc, completed_date_utc, section_index, lesson_index) VALUES ('t', 'd', 'never', 0, 0)",
                [],
            )
            .unwrap();

        assert!(matches!(repo.list_entries(), Err(DbError::InvalidData(_))));
    }
}
