//! Pillbox Domain Layer
//!
//! Core model for the pill catalog: a single entity identified by a
//! storage-assigned integer, looked up by its `(color, drawing)` pair,
//! carrying free-text info and the date it was recorded.
//!
//! ## Key Concepts
//!
//! - **PillRecord**: one catalog entry
//! - **NewPill / PillPatch**: the shapes accepted by create and update
//! - **Display date**: the `dd/mm/yyyy` form used on the wire
//! - **PillStore / StoreProvider**: the storage boundary, implemented in `pillbox-store`
//!
//! ## Architecture
//!
//! Infrastructure lives in other crates; this crate only defines the values
//! and the traits they are exchanged through.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod display_date;
pub mod pill;
pub mod traits;

// Re-exports for convenience
pub use display_date::DateParseError;
pub use pill::{NewPill, PillId, PillPatch, PillRecord};
pub use traits::{PillStore, StoreProvider};
