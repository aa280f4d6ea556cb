//! Error types for pagewave
//!
//! Two layers of errors exist. [`Error`] covers crate-level failures
//! (configuration, URL parsing, CLI plumbing) and is what public `Result`
//! APIs return. [`TerminalError`] is a per-subject failure that ends
//! processing for that subject only; it travels as data inside batch
//! outcomes so the remaining subjects keep going.

use thiserror::Error;

/// The main error type for pagewave
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// A request target failed to parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A body failed to parse as JSON
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a generic error from a message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Result type alias for pagewave
pub type Result<T> = std::result::Result<T, Error>;

/// A failure that ends processing for one subject without being retried.
///
/// Terminal errors are returned as data, not raised, so a batch of
/// independent subjects can partially fail without aborting the others.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerminalError {
    /// The remote API rejected the credentials for this subject
    #[error("HTTP {status}: authorization rejected: {body}")]
    Unauthorized {
        /// Status code as reported by the API
        status: u16,
        /// Response body
        body: String,
    },

    /// The remote API does not know this subject
    #[error("HTTP {status}: unknown subject: {body}")]
    NotFound {
        /// Status code as reported by the API
        status: u16,
        /// Response body
        body: String,
    },

    /// The retry ceiling was reached before the request resolved.
    ///
    /// Only produced when [`crate::EngineConfig::max_retries`] is set; by
    /// default transient failures retry without bound.
    #[error("Gave up after {attempts} attempts: {last_failure}")]
    RetriesExhausted {
        /// Requests made for this subject, including the first
        attempts: u32,
        /// Description of the final retryable failure
        last_failure: String,
    },
}

impl TerminalError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::NotFound { status, .. } => Some(*status),
            Self::RetriesExhausted { .. } => None,
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(status: u16, body: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            body: body.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(status: u16, body: impl Into<String>) -> Self {
        Self::NotFound {
            status,
            body: body.into(),
        }
    }
}
