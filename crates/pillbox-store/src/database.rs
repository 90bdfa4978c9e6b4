//! Session factory for the SQLite catalog

use crate::{SqliteStore, StoreError};
use pillbox_domain::StoreProvider;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default time a session waits on a locked database
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A SQLite database file that hands out one connection per session
///
/// Constructed once at process start and shared by reference with the
/// HTTP handlers and the retention worker.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteDatabase {
    /// Describe a database at `path` without touching it yet
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Override how long sessions wait for the database lock
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the pills table if it does not exist yet
    pub fn initialize(&self) -> Result<(), StoreError> {
        let mut store = SqliteStore::open(&self.path, self.busy_timeout)?;
        store.initialize_schema()?;
        tracing::info!(path = %self.path.display(), "Database initialized");
        Ok(())
    }
}

impl StoreProvider for SqliteDatabase {
    type Store = SqliteStore;

    fn open(&self) -> Result<SqliteStore, StoreError> {
        SqliteStore::open(&self.path, self.busy_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pillbox_domain::{NewPill, PillStore};

    #[test]
    fn test_sessions_share_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("pills.db"));
        db.initialize().unwrap();

        let created = {
            let mut session = db.open().unwrap();
            session
                .create(NewPill::new(
                    "azul",
                    "luna",
                    "info",
                    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                ))
                .unwrap()
        };

        let session = db.open().unwrap();
        assert_eq!(session.get(created.id).unwrap(), Some(created));
    }

    #[test]
    fn test_initialize_twice() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("pills.db"));
        db.initialize().unwrap();
        db.initialize().unwrap();
        assert!(db.open().unwrap().list_all().unwrap().is_empty());
    }
}
