//! Pillbox Storage Layer
//!
//! Implements the PillStore trait on top of a single SQLite table.
//!
//! # Architecture
//!
//! - One `pills` table, created on startup if absent (see `schema.sql`)
//! - `SqliteStore` is one open connection, i.e. one storage session
//! - `SqliteDatabase` hands out a fresh session per request or sweep
//!
//! # Examples
//!
//! ```no_run
//! use pillbox_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for pill operations
//! ```

#![warn(missing_docs)]

mod database;

pub use database::SqliteDatabase;

use chrono::NaiveDate;
use pillbox_domain::{NewPill, PillId, PillPatch, PillRecord, PillStore};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

const PILL_COLUMNS: &str = "id, color, dibujo, info, fecha";

/// SQLite-based implementation of PillStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each request or worker pass
/// should open its own SqliteStore; dropping it closes the connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a store at the given path and make sure the schema exists
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pillbox_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("pills.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut store = Self::open(path, Duration::from_secs(5))?;
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a session on an already initialized database
    ///
    /// Writers from concurrent sessions wait up to `busy_timeout` for the
    /// database lock instead of failing immediately.
    pub fn open<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        Ok(Self { conn })
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn row_to_pill(row: &Row<'_>) -> rusqlite::Result<PillRecord> {
        Ok(PillRecord {
            id: PillId::new(row.get(0)?),
            color: row.get(1)?,
            drawing: row.get(2)?,
            info: row.get(3)?,
            date: row.get(4)?,
        })
    }

    fn query_pills(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<PillRecord>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let pills = stmt
            .query_map(params, Self::row_to_pill)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pills)
    }

    fn count_to_usize(count: i64) -> Result<usize, StoreError> {
        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("Negative row count: {}", count)))
    }
}

impl PillStore for SqliteStore {
    type Error = StoreError;

    fn create(&mut self, pill: NewPill) -> Result<PillRecord, Self::Error> {
        self.conn.execute(
            "INSERT INTO pills (color, dibujo, info, fecha) VALUES (?1, ?2, ?3, ?4)",
            params![&pill.color, &pill.drawing, &pill.info, pill.date],
        )?;
        let id = PillId::new(self.conn.last_insert_rowid());

        tracing::debug!(%id, color = %pill.color, "Inserted pill");
        Ok(pill.with_id(id))
    }

    fn get(&self, id: PillId) -> Result<Option<PillRecord>, Self::Error> {
        let pill = self
            .conn
            .query_row(
                &format!("SELECT {} FROM pills WHERE id = ?1", PILL_COLUMNS),
                params![id.value()],
                Self::row_to_pill,
            )
            .optional()?;
        Ok(pill)
    }

    fn list_all(&self) -> Result<Vec<PillRecord>, Self::Error> {
        self.query_pills(
            &format!("SELECT {} FROM pills ORDER BY id", PILL_COLUMNS),
            &[],
        )
    }

    fn list_distinct_colors(&self) -> Result<Vec<String>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT color FROM pills GROUP BY color ORDER BY MIN(id)")?;
        let colors = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(colors)
    }

    fn find_by_color(&self, color: &str) -> Result<Vec<PillRecord>, Self::Error> {
        self.query_pills(
            &format!("SELECT {} FROM pills WHERE color = ?1 ORDER BY id", PILL_COLUMNS),
            &[&color],
        )
    }

    fn find_first(&self, color: &str, drawing: &str) -> Result<Option<PillRecord>, Self::Error> {
        let pill = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM pills WHERE color = ?1 AND dibujo = ?2 ORDER BY id LIMIT 1",
                    PILL_COLUMNS
                ),
                params![color, drawing],
                Self::row_to_pill,
            )
            .optional()?;
        Ok(pill)
    }

    fn update(&mut self, id: PillId, patch: &PillPatch) -> Result<Option<PillRecord>, Self::Error> {
        // One statement, so a reader never sees some fields changed and others not
        let pill = self
            .conn
            .query_row(
                &format!(
                    "UPDATE pills SET
                        color  = COALESCE(?1, color),
                        dibujo = COALESCE(?2, dibujo),
                        info   = COALESCE(?3, info),
                        fecha  = COALESCE(?4, fecha)
                     WHERE id = ?5
                     RETURNING {}",
                    PILL_COLUMNS
                ),
                params![
                    patch.color.as_deref(),
                    patch.drawing.as_deref(),
                    patch.info.as_deref(),
                    patch.date,
                    id.value(),
                ],
                Self::row_to_pill,
            )
            .optional()?;
        Ok(pill)
    }

    fn delete(&mut self, id: PillId) -> Result<bool, Self::Error> {
        let affected = self
            .conn
            .execute("DELETE FROM pills WHERE id = ?1", params![id.value()])?;
        Ok(affected > 0)
    }

    fn delete_older_than(&mut self, cutoff: NaiveDate) -> Result<usize, Self::Error> {
        let deleted = self
            .conn
            .execute("DELETE FROM pills WHERE fecha < ?1", params![cutoff])?;
        Ok(deleted)
    }

    fn count_older_than(&self, cutoff: NaiveDate) -> Result<usize, Self::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pills WHERE fecha < ?1",
            params![cutoff],
            |row| row.get(0),
        )?;
        Self::count_to_usize(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_schema_is_idempotent() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store.initialize_schema().unwrap();
        store.initialize_schema().unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_dates_stored_as_iso_text() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store
            .create(NewPill::new("rojo", "estrella", "test", ymd(2023, 3, 5)))
            .unwrap();

        let raw: String = store
            .conn
            .query_row("SELECT fecha FROM pills", [], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, "2023-03-05");
    }

    #[test]
    fn test_update_missing_id_returns_none() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let patch = PillPatch {
            info: Some("nada".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update(PillId::new(99), &patch).unwrap(), None);
    }
}
