//! Batch outcome types

use crate::error::TerminalError;
use crate::types::JsonValue;
use std::fmt;

/// Final outcome for one subject after a wave completes.
///
/// Retries are resolved inside the executor; an in-flight state never
/// escapes it.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The decoded JSON body of the successful response
    Success(JsonValue),
    /// A failure that will not be retried
    Failed(TerminalError),
}

impl BatchOutcome {
    /// True for the success variant
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True for the failed variant
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The decoded body, if successful
    pub fn success(&self) -> Option<&JsonValue> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// The terminal error, if failed
    pub fn failure(&self) -> Option<&TerminalError> {
        match self {
            Self::Success(_) => None,
            Self::Failed(err) => Some(err),
        }
    }

    /// Convert into a plain `Result`
    pub fn into_result(self) -> Result<JsonValue, TerminalError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Why a response is being retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// Connection or timeout failure from the transport
    Transport(String),
    /// 2xx response whose body did not parse as JSON
    MalformedBody(String),
    /// 500 or 502 from the remote API
    ServerError(u16),
    /// Any status outside the classified set
    Unclassified(u16),
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport failure: {message}"),
            Self::MalformedBody(message) => write!(f, "malformed body: {message}"),
            Self::ServerError(status) => write!(f, "HTTP {status}"),
            Self::Unclassified(status) => write!(f, "unexpected HTTP {status}"),
        }
    }
}
