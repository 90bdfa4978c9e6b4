//! Pillbox Service
//!
//! The operations catalog of the pill registry: listing, lookup by color
//! and drawing, create, update and delete. It validates inputs (the
//! `dd/mm/yyyy` date is the only field with rules) and turns storage
//! outcomes into typed results or errors.
//!
//! # Examples
//!
//! ```no_run
//! use pillbox_service::PillService;
//! use pillbox_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("pills.db")?;
//! let mut service = PillService::new(store);
//!
//! let created = service.create("rojo", "estrella", "test", "01/01/2023")?;
//! let info = service.get_info("rojo", "estrella")?;
//! assert_eq!(info.date, "01/01/2023");
//! # let _ = created;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod responses;
mod service;

pub use error::{NotFound, ServiceError};
pub use responses::{Created, Deleted, PillInfo, PillView, Updated};
pub use service::{PillService, PillUpdate};
