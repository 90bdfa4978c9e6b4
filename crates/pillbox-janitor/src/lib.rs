//! Pillbox Janitor
//!
//! Background retention service that purges pill records older than the
//! configured window.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Retention**: deleting every record dated strictly before `today - retention_days`
//! - **Scheduling**: running one pass at startup and then once per interval
//! - **Metrics collection**: tracking passes, failures and deletions for the logs
//!
//! A record dated exactly `retention_days` ago survives; one day older is
//! removed. Passes are idempotent, and a failed pass is logged and skipped
//! rather than stopping the schedule.
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use pillbox_janitor::{Janitor, JanitorConfig};
//! use pillbox_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("pills.db")?;
//! let mut janitor = Janitor::default_config();
//!
//! let report = janitor.sweep(&mut store)?;
//! println!("Deleted {} old entries.", report.deleted);
//! println!("{}", janitor.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use pillbox_janitor::{JanitorConfig, JanitorWorker};
//! use pillbox_store::SqliteDatabase;
//!
//! #[tokio::main]
//! async fn main() {
//!     let db = SqliteDatabase::new("pills.db");
//!     let mut worker = JanitorWorker::new(JanitorConfig::default());
//!
//!     // Run indefinitely (until Ctrl+C)
//!     worker.run(&db).await;
//! }
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! enabled = true
//! retention_days = 365
//! sweep_interval_hours = 24
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod worker;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::{Janitor, SweepReport, SweeperState};
pub use metrics::JanitorMetrics;
pub use worker::JanitorWorker;
