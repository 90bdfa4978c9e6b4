//! Trait definitions for the storage boundary
//!
//! Implemented by the infrastructure layer (pillbox-store). Each call must
//! be atomic for the single record it touches; nothing here promises
//! cross-record transactions.

use crate::{NewPill, PillId, PillPatch, PillRecord};
use chrono::NaiveDate;

/// Durable table of pill records
pub trait PillStore {
    /// Error type for store operations
    type Error;

    /// Persist a new record, returning it with its freshly assigned id
    fn create(&mut self, pill: NewPill) -> Result<PillRecord, Self::Error>;

    /// Get a record by id
    fn get(&self, id: PillId) -> Result<Option<PillRecord>, Self::Error>;

    /// All records, in insertion order
    fn list_all(&self) -> Result<Vec<PillRecord>, Self::Error>;

    /// Distinct colors present in the table
    fn list_distinct_colors(&self) -> Result<Vec<String>, Self::Error>;

    /// Records whose color matches exactly
    fn find_by_color(&self, color: &str) -> Result<Vec<PillRecord>, Self::Error>;

    /// First record matching both color and drawing
    ///
    /// Duplicated pairs are allowed; which one comes back is not part of
    /// the contract.
    fn find_first(&self, color: &str, drawing: &str) -> Result<Option<PillRecord>, Self::Error>;

    /// Apply the provided fields, leaving the others untouched
    ///
    /// Returns `None` when no record has this id.
    fn update(&mut self, id: PillId, patch: &PillPatch) -> Result<Option<PillRecord>, Self::Error>;

    /// Remove a record, returning whether it existed
    fn delete(&mut self, id: PillId) -> Result<bool, Self::Error>;

    /// Remove every record dated strictly before `cutoff`
    fn delete_older_than(&mut self, cutoff: NaiveDate) -> Result<usize, Self::Error>;

    /// Count the records dated strictly before `cutoff`
    fn count_older_than(&self, cutoff: NaiveDate) -> Result<usize, Self::Error>;
}

/// Source of storage sessions
///
/// Every request and every sweep opens its own session and drops it when
/// finished, so the underlying connection is released on all exit paths.
pub trait StoreProvider: Send + Sync {
    /// Session type handed out
    type Store: PillStore;

    /// Open a new session
    fn open(&self) -> Result<Self::Store, <Self::Store as PillStore>::Error>;
}
