//! Configuration file parsing for the Pillbox server.
//!
//! Loads bind address, database location, retention schedule, CORS and
//! logging settings from a TOML file. Every section is optional.

use pillbox_janitor::JanitorConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PillboxConfig {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Retention sweep
    #[serde(default)]
    pub janitor: JanitorConfig,

    /// Cross-origin policy
    #[serde(default)]
    pub cors: CorsConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
        }
    }
}

impl ServerConfig {
    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, created if missing
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("pills.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Attach a CORS layer at all
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,

    /// Allowed origins; `["*"]` allows any
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_cors_enabled() -> bool {
    true
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    /// Build a CorsLayer from the configuration.
    ///
    /// Returns None if CORS is disabled. Methods and headers are always
    /// unrestricted; only origins are configurable.
    pub fn to_layer(&self) -> Option<CorsLayer> {
        if !self.enabled {
            tracing::debug!("CORS is disabled");
            return None;
        }

        let allow_origin = if self.allowed_origins.iter().any(|o| o == "*") {
            AllowOrigin::any()
        } else {
            let origins: Vec<axum::http::HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!(origin = %origin, "Invalid CORS origin, skipping");
                        None
                    })
                })
                .collect();
            tracing::info!(origins = ?self.allowed_origins, "CORS: Allowing specific origins");
            AllowOrigin::list(origins)
        };

        Some(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods(AllowMethods::any())
                .allow_headers(AllowHeaders::any()),
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Base level when `RUST_LOG` is unset: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl PillboxConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: PillboxConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.janitor
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "database.path must not be empty".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PillboxConfig::default();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.database.path, PathBuf::from("pills.db"));
        assert_eq!(config.janitor.retention_days, 365);
        assert_eq!(config.cors.allowed_origins, vec!["*"]);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: PillboxConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_port, 8000);
        assert!(config.janitor.enabled);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [server]
            bind_address = "0.0.0.0"
            bind_port = 9000

            [database]
            path = "/var/lib/pillbox/pills.db"

            [janitor]
            retention_days = 30
            dry_run = true

            [cors]
            allowed_origins = ["https://example.org"]

            [logging]
            level = "debug"
        "#;

        let config: PillboxConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.database.path, PathBuf::from("/var/lib/pillbox/pills.db"));
        assert_eq!(config.janitor.retention_days, 30);
        assert_eq!(config.janitor.sweep_interval_hours, 24);
        assert!(config.janitor.dry_run);
        assert_eq!(config.cors.allowed_origins, vec!["https://example.org"]);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_retention() {
        let mut config = PillboxConfig::default();
        config.janitor.retention_days = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.janitor.retention_days = u32::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_database_path() {
        let mut config = PillboxConfig::default();
        config.database.path = PathBuf::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let mut config = PillboxConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pillbox.toml");
        std::fs::write(&path, "[server]\nbind_port = 8123\n").unwrap();

        let config = PillboxConfig::from_file(&path).unwrap();
        assert_eq!(config.server.bind_port, 8123);

        assert!(matches!(
            PillboxConfig::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::FileRead(_))
        ));

        std::fs::write(&path, "[server\n").unwrap();
        assert!(matches!(
            PillboxConfig::from_file(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_cors_layer() {
        assert!(CorsConfig::default().to_layer().is_some());

        let disabled = CorsConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(disabled.to_layer().is_none());
    }
}
