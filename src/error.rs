//! Error types for the sequence reporter.

use thiserror::Error;

/// Top-level error type for reporter operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failed (connection refused, timeout, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The sequencer answered with a non-success status code.
    #[error("sequencer at {url} responded with status {status}")]
    Status { status: u16, url: String },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading events or configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reporter configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for reporter operations.
pub type Result<T> = std::result::Result<T, Error>;
