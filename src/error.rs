//! Error types for rdw-vehicle-mcp.
//!
//! None of these errors ever reach an MCP client directly. Configuration
//! errors abort startup, fetch errors are absorbed by the data fetcher, and
//! decode errors are logged before the offending line is skipped.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },

    /// The HTTP client could not be constructed from the configuration.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors raised while fetching records from one RDW dataset.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS, timeout or other transport failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// The response body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An input line that is not a usable JSON-RPC request.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The line is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The line is JSON but not an object.
    #[error("message is not a JSON object")]
    NotAnObject,

    /// The object has no string `method` field.
    #[error("message has no method")]
    MissingMethod,
}
