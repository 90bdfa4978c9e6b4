//! Service error types
//!
//! `Display` of the caller-facing variants is the exact Spanish detail
//! existing clients expect.

use pillbox_domain::{DateParseError, PillId};
use std::fmt;
use thiserror::Error;

/// What could not be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    /// No record has this color
    Color,
    /// No record has this color and drawing
    ColorAndDrawing,
    /// No record has this id
    Id(PillId),
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFound::Color => f.write_str("No hay pastillas de ese color."),
            NotFound::ColorAndDrawing => {
                f.write_str("No se encontró pastilla de ese color y dibujo.")
            }
            NotFound::Id(_) => f.write_str("No se encontró pastilla con ese ID."),
        }
    }
}

/// Errors surfaced by the pill service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Lookup matched nothing
    #[error("{0}")]
    NotFound(NotFound),

    /// `fecha` was not a valid dd/mm/yyyy date
    #[error("Fecha inválida.")]
    InvalidDate(#[source] DateParseError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),
}

impl ServiceError {
    pub(crate) fn store(err: impl fmt::Display) -> Self {
        ServiceError::Store(err.to_string())
    }
}

impl From<DateParseError> for ServiceError {
    fn from(err: DateParseError) -> Self {
        ServiceError::InvalidDate(err)
    }
}
