//! Pill module - the single entity of the catalog

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Identifier of a pill record, assigned by storage on creation
///
/// Ids are never reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PillId(i64);

impl PillId {
    /// Wrap a raw storage id
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PillId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|e| format!("Invalid pill id '{}': {}", s, e))
    }
}

impl From<i64> for PillId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A pill record as persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillRecord {
    /// Storage-assigned identity, immutable
    pub id: PillId,

    /// Color classification
    pub color: String,

    /// Pattern or marking on the pill
    pub drawing: String,

    /// Free-text description (substance, risk notes)
    pub info: String,

    /// Date the entry was recorded or observed
    pub date: NaiveDate,
}

/// A pill record that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPill {
    /// Color classification
    pub color: String,
    /// Pattern or marking on the pill
    pub drawing: String,
    /// Free-text description
    pub info: String,
    /// Date the entry was recorded
    pub date: NaiveDate,
}

impl NewPill {
    /// Create a new unsaved record
    pub fn new(
        color: impl Into<String>,
        drawing: impl Into<String>,
        info: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            color: color.into(),
            drawing: drawing.into(),
            info: info.into(),
            date,
        }
    }

    /// Attach the id storage assigned
    pub fn with_id(self, id: PillId) -> PillRecord {
        PillRecord {
            id,
            color: self.color,
            drawing: self.drawing,
            info: self.info,
            date: self.date,
        }
    }
}

/// Partial update of a pill record
///
/// Every field is optional; `None` keeps the stored value. The date is
/// already parsed, so applying a patch can no longer fail validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PillPatch {
    /// New color
    pub color: Option<String>,
    /// New drawing
    pub drawing: Option<String>,
    /// New info
    pub info: Option<String>,
    /// New date
    pub date: Option<NaiveDate>,
}

impl PillPatch {
    /// True when the patch would not change anything
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.drawing.is_none() && self.info.is_none() && self.date.is_none()
    }

    /// Apply the patch to a record in memory
    ///
    /// This is the reference for what an update means: every `Some` field
    /// replaces the stored value and every `None` keeps it. Store
    /// implementations that update in place (such as a single SQL
    /// statement) must produce the same record as this method.
    pub fn apply_to(&self, record: &mut PillRecord) {
        if let Some(color) = &self.color {
            record.color = color.clone();
        }
        if let Some(drawing) = &self.drawing {
            record.drawing = drawing.clone();
        }
        if let Some(info) = &self.info {
            record.info = info.clone();
        }
        if let Some(date) = self.date {
            record.date = date;
        }
    }
}
