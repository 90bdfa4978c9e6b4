//! Tracing subscriber setup

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Calling this
/// twice is harmless; the second subscriber is simply not installed.
pub fn init_tracing(config: &LoggingConfig) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_env_filter(&config.level, rust_log.as_deref());

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

fn build_env_filter(level: &str, rust_log: Option<&str>) -> EnvFilter {
    let base_level = level.to_ascii_lowercase();

    match rust_log {
        Some(directives) => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(&base_level))
        }
        // Quiet the HTTP stack unless asked for explicitly
        None => EnvFilter::new(format!("{},hyper=warn,tower_http=info", base_level)),
    }
}
