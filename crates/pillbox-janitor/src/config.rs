//! Configuration for the retention sweep
//!
//! Defines how old a record may get and how often the sweep runs.

use crate::JanitorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Janitor service
///
/// # Examples
///
/// ```
/// use pillbox_janitor::JanitorConfig;
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.retention_days, 365);
/// assert_eq!(config.sweep_interval_hours, 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JanitorConfig {
    /// Run the background sweep at all
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Records dated more than this many days ago are purged
    /// Default: 365
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// How often to run the sweep (in hours)
    /// Default: 24 (once per day)
    #[serde(default = "default_sweep_interval_hours")]
    pub sweep_interval_hours: u64,

    /// Log what would be deleted without deleting it
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_retention_days() -> u32 {
    365
}

fn default_sweep_interval_hours() -> u64 {
    24
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            retention_days: default_retention_days(),
            sweep_interval_hours: default_sweep_interval_hours(),
            dry_run: false,
        }
    }
}

/// Longest retention window accepted, roughly a century
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// Longest sweep interval accepted, one year
pub const MAX_SWEEP_INTERVAL_HOURS: u64 = 24 * 366;

impl JanitorConfig {
    /// Get sweep interval as Duration
    ///
    /// Out-of-range values are clamped to `1..=MAX_SWEEP_INTERVAL_HOURS`
    /// so an unvalidated config still yields a usable timer.
    pub fn sweep_interval(&self) -> Duration {
        let hours = self.sweep_interval_hours.clamp(1, MAX_SWEEP_INTERVAL_HOURS);
        Duration::from_secs(hours * 3600)
    }

    /// Reject values the worker cannot run with
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.retention_days == 0 {
            return Err(JanitorError::Config(
                "retention_days must be greater than 0".to_string(),
            ));
        }
        if self.retention_days > MAX_RETENTION_DAYS {
            return Err(JanitorError::Config(format!(
                "retention_days must be at most {}",
                MAX_RETENTION_DAYS
            )));
        }
        if self.sweep_interval_hours == 0 {
            return Err(JanitorError::Config(
                "sweep_interval_hours must be greater than 0".to_string(),
            ));
        }
        if self.sweep_interval_hours > MAX_SWEEP_INTERVAL_HOURS {
            return Err(JanitorError::Config(format!(
                "sweep_interval_hours must be at most {}",
                MAX_SWEEP_INTERVAL_HOURS
            )));
        }
        Ok(())
    }
}
