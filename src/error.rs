// src/error.rs

//! Unified error handling for the job watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for job watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with something other than 200 OK
    #[error("GET {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Fetch did not finish before the configured deadline
    #[error("Source '{source_name}' did not respond within {secs}s")]
    Timeout { source_name: String, secs: u64 },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Response body could not be read as the expected document
    #[error("Parse error for {context}: {message}")]
    Parse { context: String, message: String },

    /// State file could not be read, decoded or written
    #[error("State file {path}: {message}")]
    State { path: String, message: String },

    /// No factory registered under the requested name
    #[error("Unknown source '{name}' (available: {available})")]
    UnknownSource { name: String, available: String },

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notify(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a document parsing error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a state persistence error for the given location.
    pub fn state(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::State {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
