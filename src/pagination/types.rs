//! Pagination types
//!
//! [`PageShape`] tells the paginator where records and the continuation
//! cursor live inside a page body; [`decode_page`] applies it.

use crate::error::TerminalError;
use crate::types::{Cursor, JsonValue, CURSOR_DONE};

/// Where to find records and the continuation cursor in a page body
#[derive(Debug, Clone)]
pub struct PageShape {
    /// Dotted path to the record array (e.g. `"users"` or `"data.items"`).
    /// An empty path means the body itself is the record array.
    pub records_path: String,
    /// Dotted path to the field carrying the next-page cursor. A missing
    /// field reads as 0, ending pagination.
    pub cursor_field: String,
}

impl PageShape {
    /// Create a shape from a records path and cursor field
    pub fn new(records_path: impl Into<String>, cursor_field: impl Into<String>) -> Self {
        Self {
            records_path: records_path.into(),
            cursor_field: cursor_field.into(),
        }
    }

    /// Shape with the conventional `next_cursor` field
    pub fn records(records_path: impl Into<String>) -> Self {
        Self::new(records_path, "next_cursor")
    }
}

impl Default for PageShape {
    fn default() -> Self {
        Self::records("")
    }
}

/// What the continuation callback observes for one subject each round: a
/// page of records (possibly empty), or the terminal failure that ended
/// the subject
pub type PageResult = Result<Vec<JsonValue>, TerminalError>;

/// One decoded page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Records extracted from the body
    pub records: Vec<JsonValue>,
    /// Cursor for the next round; 0 means exhausted
    pub next_cursor: Cursor,
}

/// Decode a page body according to a shape.
///
/// A body without an array at the records path yields an empty page; a
/// missing or non-integer cursor field yields 0.
pub fn decode_page(body: &JsonValue, shape: &PageShape) -> Page {
    let records = match extract_path(body, &shape.records_path) {
        Some(JsonValue::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    let next_cursor = extract_path(body, &shape.cursor_field)
        .and_then(JsonValue::as_i64)
        .unwrap_or(CURSOR_DONE);

    Page {
        records,
        next_cursor,
    }
}

/// Walk a dotted path through nested objects
fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}
