//! Metrics collection for Janitor operations

use chrono::NaiveDate;

/// Counters kept across sweep passes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JanitorMetrics {
    /// Passes that finished successfully
    pub sweep_count: usize,

    /// Passes that failed (storage unavailable, query error)
    pub failed_sweeps: usize,

    /// Records deleted across all passes
    pub total_deleted: usize,

    /// Records deleted (or, in dry-run, matched) by the most recent successful pass
    pub last_deleted: Option<usize>,

    /// Cutoff used by the most recent successful pass
    pub last_cutoff: Option<NaiveDate>,

    /// Wall time spent sweeping, in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed pass
    pub fn record_sweep(&mut self, cutoff: NaiveDate, deleted: usize, dry_run: bool) {
        self.sweep_count += 1;
        self.last_cutoff = Some(cutoff);
        self.last_deleted = Some(deleted);
        if !dry_run {
            self.total_deleted += deleted;
        }
    }

    /// Record a failed pass
    pub fn record_failure(&mut self) {
        self.failed_sweeps += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Failed sweeps: {}", self.failed_sweeps),
            format!("Total deleted: {}", self.total_deleted),
            format!("Total runtime: {}ms", self.total_runtime_ms),
        ];

        if let (Some(cutoff), Some(deleted)) = (self.last_cutoff, self.last_deleted) {
            lines.push(format!("Last sweep: {} records before {}", deleted, cutoff));
        }

        lines.join("\n")
    }
}
