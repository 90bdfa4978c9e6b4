//! Background worker for continuous Janitor operation

use crate::{Janitor, JanitorConfig, JanitorMetrics, SweepReport, SweeperState};
use pillbox_domain::{PillStore, StoreProvider};
use std::fmt::Display;
use std::future::Future;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Background worker that runs the Janitor on a schedule
///
/// Every tick opens a fresh storage session, runs one pass and drops the
/// session. A failed pass is logged and the schedule carries on.
///
/// # Examples
///
/// ```no_run
/// use pillbox_janitor::{JanitorConfig, JanitorWorker};
/// use pillbox_store::SqliteDatabase;
///
/// #[tokio::main]
/// async fn main() {
///     let db = SqliteDatabase::new("pills.db");
///     let mut worker = JanitorWorker::new(JanitorConfig::default());
///
///     // Run until Ctrl+C
///     worker.run(&db).await;
/// }
/// ```
pub struct JanitorWorker {
    janitor: Janitor,
    interval: Duration,
}

impl JanitorWorker {
    /// Create a new background worker with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        let interval = config.sweep_interval();
        Self {
            janitor: Janitor::new(config),
            interval,
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Run the worker until a shutdown signal (Ctrl+C) is received
    pub async fn run<P>(&mut self, provider: &P)
    where
        P: StoreProvider,
        <P::Store as PillStore>::Error: Display,
    {
        self.run_until(provider, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the worker until `shutdown` completes
    ///
    /// The first pass runs immediately, then once per interval. A pass that
    /// overruns its slot delays the next one rather than triggering a burst.
    pub async fn run_until<P, F>(&mut self, provider: &P, shutdown: F)
    where
        P: StoreProvider,
        <P::Store as PillStore>::Error: Display,
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            interval = ?self.interval,
            retention_days = self.janitor.config().retention_days,
            dry_run = self.janitor.config().dry_run,
            "Janitor worker started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_pass(provider);
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping janitor");
                    break;
                }
            }
        }

        tracing::info!("Janitor stopped. Final metrics:\n{}", self.janitor.metrics().summary());
    }

    /// Run for a specific number of cycles (useful for testing and one-off maintenance)
    pub async fn run_cycles<P>(&mut self, provider: &P, cycles: usize)
    where
        P: StoreProvider,
        <P::Store as PillStore>::Error: Display,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting sweep cycle {}/{}", cycle + 1, cycles);
            self.run_pass(provider);
        }

        tracing::info!(
            "Janitor finished {} cycles. Final metrics:\n{}",
            cycles,
            self.janitor.metrics().summary()
        );
    }

    /// One pass with its own storage session; errors are logged, never returned
    pub fn run_pass<P>(&mut self, provider: &P) -> Option<SweepReport>
    where
        P: StoreProvider,
        <P::Store as PillStore>::Error: Display,
    {
        tracing::debug!("Starting sweep cycle");

        let mut store = match provider.open() {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(error = %e, "Error during cleanup: could not open storage");
                self.janitor.record_failure();
                return None;
            }
        };

        match self.janitor.sweep(&mut store) {
            Ok(report) => {
                if report.deleted > 0 {
                    tracing::info!(
                        deleted = report.deleted,
                        cutoff = %report.cutoff,
                        dry_run = report.dry_run,
                        "Sweep completed"
                    );
                } else {
                    tracing::debug!(cutoff = %report.cutoff, "Sweep completed, no records to delete");
                }
                Some(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error during cleanup");
                None
            }
        }
    }

    /// Get a reference to the janitor's current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        self.janitor.metrics()
    }

    /// Reset the janitor's metrics counters
    pub fn reset_metrics(&mut self) {
        self.janitor.reset_metrics();
    }

    /// Whether a pass is running right now
    pub fn state(&self) -> SweeperState {
        self.janitor.state()
    }
}
