//! Common types used throughout pagewave
//!
//! Shared type definitions, type aliases, and the subject identifier that
//! keys every batch and pagination structure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Cursor
// ============================================================================

/// Pagination cursor.
///
/// `-1` starts pagination, `0` signals no further pages, and any other
/// value is opaque: it must be echoed verbatim in the next request.
pub type Cursor = i64;

/// Cursor value that starts pagination for a subject
pub const CURSOR_START: Cursor = -1;

/// Cursor value signalling that no further pages exist
pub const CURSOR_DONE: Cursor = 0;

// ============================================================================
// Subject Identifier
// ============================================================================

/// Identifier for one logical entity being queried.
///
/// Remote APIs commonly address the same resource by either a numeric id
/// or a name-like handle (`?user_id=123` vs `?screen_name=alice`); request
/// builders can dispatch on the variant. Identity is preserved across
/// retries and pages, and the type is usable as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
    /// Numeric identifier
    Id(u64),
    /// Name-like identifier
    Name(String),
}

impl SubjectId {
    /// Parse a string input, treating all-digit values as numeric ids
    pub fn parse(input: &str) -> Self {
        input
            .parse::<u64>()
            .map_or_else(|_| Self::Name(input.to_string()), Self::Id)
    }

    /// True for the numeric variant
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Id(_))
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for SubjectId {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for SubjectId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for SubjectId {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}
