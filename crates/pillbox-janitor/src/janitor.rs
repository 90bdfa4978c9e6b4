//! Core Janitor implementation: one retention pass over the pill table

use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use chrono::{Days, Local, NaiveDate};
use pillbox_domain::PillStore;
use std::fmt::Display;
use std::time::Instant;

/// Whether a pass is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SweeperState {
    /// Waiting for the next trigger
    Idle,
    /// A pass is running
    Running,
}

/// Outcome of a single pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Records dated strictly before this were targeted
    pub cutoff: NaiveDate,
    /// Records deleted, or in dry-run the records that would have been
    pub deleted: usize,
    /// Whether the pass only counted
    pub dry_run: bool,
}

/// Janitor service for retention-driven deletion
///
/// Each pass is independent: re-running it over records a previous pass
/// already removed simply deletes nothing.
///
/// # Examples
///
/// ```no_run
/// use pillbox_janitor::{Janitor, JanitorConfig};
/// use pillbox_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new(":memory:")?;
/// let mut janitor = Janitor::new(JanitorConfig::default());
///
/// let report = janitor.sweep(&mut store)?;
/// println!("deleted {} records before {}", report.deleted, report.cutoff);
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    metrics: JanitorMetrics,
    state: SweeperState,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            metrics: JanitorMetrics::new(),
            state: SweeperState::Idle,
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Configuration in use
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Current state
    pub fn state(&self) -> SweeperState {
        self.state
    }

    /// Oldest date that survives a pass run on `today`
    ///
    /// Fails when the window reaches past the earliest representable date.
    pub fn cutoff_for(&self, today: NaiveDate) -> Result<NaiveDate, JanitorError> {
        today
            .checked_sub_days(Days::new(u64::from(self.config.retention_days)))
            .ok_or_else(|| {
                JanitorError::Config(format!(
                    "retention_days {} reaches before the earliest supported date",
                    self.config.retention_days
                ))
            })
    }

    /// Run one pass using the local calendar date as "today"
    pub fn sweep<S>(&mut self, store: &mut S) -> Result<SweepReport, JanitorError>
    where
        S: PillStore,
        S::Error: Display,
    {
        self.sweep_at(store, Local::now().date_naive())
    }

    /// Run one pass as if today were `today`
    ///
    /// Deletes every record dated strictly before `today - retention_days`.
    /// Failures are counted in the metrics and returned; the Janitor is
    /// back to `Idle` either way.
    pub fn sweep_at<S>(&mut self, store: &mut S, today: NaiveDate) -> Result<SweepReport, JanitorError>
    where
        S: PillStore,
        S::Error: Display,
    {
        self.state = SweeperState::Running;
        let start = Instant::now();

        let result = self
            .cutoff_for(today)
            .and_then(|cutoff| self.purge(store, cutoff));

        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                self.metrics
                    .record_sweep(report.cutoff, report.deleted, report.dry_run)
            }
            Err(_) => self.metrics.record_failure(),
        }
        self.state = SweeperState::Idle;

        result
    }

    /// Record a pass that failed before reaching the store
    pub fn record_failure(&mut self) {
        self.metrics.record_failure();
    }

    fn purge<S>(&self, store: &mut S, cutoff: NaiveDate) -> Result<SweepReport, JanitorError>
    where
        S: PillStore,
        S::Error: Display,
    {
        if self.config.dry_run {
            let matched = store
                .count_older_than(cutoff)
                .map_err(|e| JanitorError::Store(e.to_string()))?;

            tracing::info!(
                cutoff = %cutoff,
                matched,
                "DRY RUN: Would delete {} pills dated before {}",
                matched,
                cutoff
            );
            return Ok(SweepReport {
                cutoff,
                deleted: matched,
                dry_run: true,
            });
        }

        let deleted = store
            .delete_older_than(cutoff)
            .map_err(|e| JanitorError::Store(e.to_string()))?;

        if deleted > 0 {
            tracing::info!(deleted, cutoff = %cutoff, "Deleted {} old entries", deleted);
        }

        Ok(SweepReport {
            cutoff,
            deleted,
            dry_run: false,
        })
    }
}
