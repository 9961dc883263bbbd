//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.
//! Every section is optional; an empty object yields the defaults.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::rdw::DEFAULT_TIMEOUT_SECS;

/// Upper bound for `http.timeout_secs`.
const MAX_TIMEOUT_SECS: u64 = 300;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.http.timeout_secs) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid http.timeout_secs {}. Must be between 1 and {MAX_TIMEOUT_SECS}",
                    self.http.timeout_secs
                ),
            });
        }

        if self
            .http
            .user_agent
            .as_deref()
            .is_some_and(|ua| ua.trim().is_empty())
        {
            return Err(ConfigError::ValidationError {
                message: "http.user_agent cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    /// Default: 10
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent to the RDW API.
    /// Default: `rdw-vehicle-mcp/<version>`
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl HttpConfig {
    /// The request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured user agent, or the crate default.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| concat!("rdw-vehicle-mcp/", env!("CARGO_PKG_VERSION")).to_string())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
