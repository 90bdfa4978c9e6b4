//! Result shapes returned by the service, serialized as clients see them

use pillbox_domain::{display_date, PillId, PillRecord};
use serde::{Deserialize, Serialize};

/// Success message for create
pub const CREATED_MESSAGE: &str = "Pastilla añadida con éxito.";
/// Success message for update
pub const UPDATED_MESSAGE: &str = "Pastilla actualizada con éxito.";
/// Success message for delete
pub const DELETED_MESSAGE: &str = "Pastilla eliminada con éxito.";

/// A full record with its date in display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillView {
    /// Record id
    pub id: i64,
    /// Color classification
    pub color: String,
    /// Pattern or marking
    #[serde(rename = "dibujo")]
    pub drawing: String,
    /// Free-text description
    pub info: String,
    /// `dd/mm/yyyy`
    #[serde(rename = "fecha")]
    pub date: String,
}

impl From<PillRecord> for PillView {
    fn from(record: PillRecord) -> Self {
        Self {
            id: record.id.value(),
            color: record.color,
            drawing: record.drawing,
            info: record.info,
            date: display_date::format(record.date),
        }
    }
}

/// Info and date of the pill matching a color and drawing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillInfo {
    /// Free-text description
    pub info: String,
    /// `dd/mm/yyyy`
    pub date: String,
}

/// Outcome of a create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    /// Human-readable confirmation
    pub message: String,
    /// Id of the new record
    #[serde(rename = "pill")]
    pub id: i64,
}

impl Created {
    pub(crate) fn new(id: PillId) -> Self {
        Self {
            message: CREATED_MESSAGE.to_string(),
            id: id.value(),
        }
    }
}

/// Outcome of an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Updated {
    /// Human-readable confirmation
    pub message: String,
    /// Id of the updated record
    #[serde(rename = "pill")]
    pub id: i64,
}

impl Updated {
    pub(crate) fn new(id: PillId) -> Self {
        Self {
            message: UPDATED_MESSAGE.to_string(),
            id: id.value(),
        }
    }
}

/// Outcome of a delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    /// Human-readable confirmation
    pub message: String,
}

impl Deleted {
    pub(crate) fn new() -> Self {
        Self {
            message: DELETED_MESSAGE.to_string(),
        }
    }
}
