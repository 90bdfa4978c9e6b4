//! The pill operations catalog

use crate::error::{NotFound, ServiceError};
use crate::responses::{Created, Deleted, PillInfo, PillView, Updated};
use pillbox_domain::{display_date, NewPill, PillId, PillPatch, PillStore};
use std::fmt::Display;

/// Raw update request, as received from a client
///
/// Every field is optional. Empty strings count as "not supplied",
/// matching how existing clients clear a form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PillUpdate {
    /// New color
    pub color: Option<String>,
    /// New drawing
    pub drawing: Option<String>,
    /// New info
    pub info: Option<String>,
    /// New date, `dd/mm/yyyy`
    pub date: Option<String>,
}

impl PillUpdate {
    /// Validate every supplied field and build the patch to store
    ///
    /// Nothing is written before this succeeds, so a bad date never
    /// commits the other fields.
    fn into_patch(self) -> Result<PillPatch, ServiceError> {
        let date = match supplied(self.date) {
            Some(raw) => Some(display_date::parse(&raw)?),
            None => None,
        };

        Ok(PillPatch {
            color: supplied(self.color),
            drawing: supplied(self.drawing),
            info: supplied(self.info),
            date,
        })
    }
}

fn supplied(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Pill service bound to one storage session
///
/// Built per request around a freshly opened store; dropping the service
/// drops the session.
pub struct PillService<S> {
    store: S,
}

impl<S> PillService<S>
where
    S: PillStore,
    S::Error: Display,
{
    /// Wrap a storage session
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Give the storage session back
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Every record, dates in display form
    pub fn list_all(&self) -> Result<Vec<PillView>, ServiceError> {
        let pills = self.store.list_all().map_err(ServiceError::store)?;
        tracing::debug!(count = pills.len(), "Listed pills");
        Ok(pills.into_iter().map(PillView::from).collect())
    }

    /// Distinct colors present in the catalog
    pub fn list_colors(&self) -> Result<Vec<String>, ServiceError> {
        self.store
            .list_distinct_colors()
            .map_err(ServiceError::store)
    }

    /// Drawings of every record with this color
    ///
    /// An unknown color is an error rather than an empty list.
    pub fn list_drawings_by_color(&self, color: &str) -> Result<Vec<String>, ServiceError> {
        let pills = self
            .store
            .find_by_color(color)
            .map_err(ServiceError::store)?;

        if pills.is_empty() {
            tracing::debug!(color, "No pills for color");
            return Err(ServiceError::NotFound(NotFound::Color));
        }

        Ok(pills.into_iter().map(|pill| pill.drawing).collect())
    }

    /// Info and date of the first record with this color and drawing
    pub fn get_info(&self, color: &str, drawing: &str) -> Result<PillInfo, ServiceError> {
        let pill = self
            .store
            .find_first(color, drawing)
            .map_err(ServiceError::store)?
            .ok_or(ServiceError::NotFound(NotFound::ColorAndDrawing))?;

        Ok(PillInfo {
            info: pill.info,
            date: display_date::format(pill.date),
        })
    }

    /// Add a record; `date` must be `dd/mm/yyyy`
    pub fn create(
        &mut self,
        color: &str,
        drawing: &str,
        info: &str,
        date: &str,
    ) -> Result<Created, ServiceError> {
        let date = display_date::parse(date)?;

        let pill = self
            .store
            .create(NewPill::new(color, drawing, info, date))
            .map_err(ServiceError::store)?;

        tracing::info!(id = %pill.id, color, drawing, "Pill created");
        Ok(Created::new(pill.id))
    }

    /// Change the supplied fields of an existing record
    ///
    /// Order of checks: unknown id, then invalid date, then a single
    /// atomic write.
    pub fn update(&mut self, id: PillId, update: PillUpdate) -> Result<Updated, ServiceError> {
        if self.store.get(id).map_err(ServiceError::store)?.is_none() {
            return Err(ServiceError::NotFound(NotFound::Id(id)));
        }

        let patch = update.into_patch()?;
        if patch.is_empty() {
            tracing::debug!(%id, "Update with no fields, nothing to write");
            return Ok(Updated::new(id));
        }

        // The record may have been deleted since the check above
        let pill = self
            .store
            .update(id, &patch)
            .map_err(ServiceError::store)?
            .ok_or(ServiceError::NotFound(NotFound::Id(id)))?;

        tracing::info!(id = %pill.id, "Pill updated");
        Ok(Updated::new(pill.id))
    }

    /// Remove a record by id
    pub fn delete(&mut self, id: PillId) -> Result<Deleted, ServiceError> {
        if !self.store.delete(id).map_err(ServiceError::store)? {
            return Err(ServiceError::NotFound(NotFound::Id(id)));
        }

        tracing::info!(%id, "Pill deleted");
        Ok(Deleted::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pillbox_domain::PillRecord;

    // Store whose every call fails, as if the database were unreachable
    struct UnavailableStore;

    impl PillStore for UnavailableStore {
        type Error = String;

        fn create(&mut self, _pill: NewPill) -> Result<PillRecord, Self::Error> {
            Err("database is locked".to_string())
        }

        fn get(&self, _id: PillId) -> Result<Option<PillRecord>, Self::Error> {
            Err("database is locked".to_string())
        }

        fn list_all(&self) -> Result<Vec<PillRecord>, Self::Error> {
            Err("database is locked".to_string())
        }

        fn list_distinct_colors(&self) -> Result<Vec<String>, Self::Error> {
            Err("database is locked".to_string())
        }

        fn find_by_color(&self, _color: &str) -> Result<Vec<PillRecord>, Self::Error> {
            Err("database is locked".to_string())
        }

        fn find_first(&self, _color: &str, _drawing: &str) -> Result<Option<PillRecord>, Self::Error> {
            Err("database is locked".to_string())
        }

        fn update(&mut self, _id: PillId, _patch: &PillPatch) -> Result<Option<PillRecord>, Self::Error> {
            Err("database is locked".to_string())
        }

        fn delete(&mut self, _id: PillId) -> Result<bool, Self::Error> {
            Err("database is locked".to_string())
        }

        fn delete_older_than(&mut self, _cutoff: NaiveDate) -> Result<usize, Self::Error> {
            Err("database is locked".to_string())
        }

        fn count_older_than(&self, _cutoff: NaiveDate) -> Result<usize, Self::Error> {
            Err("database is locked".to_string())
        }
    }

    #[test]
    fn test_store_failures_surface_as_store_errors() {
        let mut service = PillService::new(UnavailableStore);

        assert!(matches!(service.list_all(), Err(ServiceError::Store(_))));
        assert!(matches!(service.list_colors(), Err(ServiceError::Store(_))));
        assert!(matches!(
            service.list_drawings_by_color("rojo"),
            Err(ServiceError::Store(_))
        ));
        assert!(matches!(
            service.create("rojo", "estrella", "x", "01/01/2023"),
            Err(ServiceError::Store(_))
        ));
        assert!(matches!(
            service.delete(PillId::new(1)),
            Err(ServiceError::Store(msg)) if msg == "database is locked"
        ));
    }

    #[test]
    fn test_invalid_date_checked_before_store() {
        let mut service = PillService::new(UnavailableStore);
        assert!(matches!(
            service.create("rojo", "estrella", "x", "99/99/2023"),
            Err(ServiceError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_empty_strings_are_not_supplied() {
        let update = PillUpdate {
            color: Some(String::new()),
            drawing: Some("luna".to_string()),
            info: None,
            date: Some(String::new()),
        };
        let patch = update.into_patch().unwrap();
        assert_eq!(patch.color, None);
        assert_eq!(patch.drawing.as_deref(), Some("luna"));
        assert_eq!(patch.info, None);
        assert_eq!(patch.date, None);
    }

    #[test]
    fn test_bad_date_rejects_whole_patch() {
        let update = PillUpdate {
            color: Some("azul".to_string()),
            date: Some("31/02/2023".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            update.into_patch(),
            Err(ServiceError::InvalidDate(_))
        ));
    }
}
