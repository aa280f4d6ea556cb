//! Convenience aggregation over cursor pagination
//!
//! The two entry points wrap [`CursorPaginator`] with canned continuation
//! decisions: fetch everything, or fetch until a record limit is reached.

use crate::error::TerminalError;
use crate::pagination::CursorPaginator;
use crate::request::RequestDescriptor;
use crate::types::{Cursor, JsonValue, SubjectId};
use std::collections::HashMap;
use tracing::debug;

/// Accumulated records per subject, or the terminal failure that replaced
/// them
pub type Collected = HashMap<SubjectId, Result<Vec<JsonValue>, TerminalError>>;

/// Fetch every page for every subject, concatenating records in page order.
///
/// A terminal failure replaces whatever the subject had accumulated; other
/// subjects are unaffected.
pub async fn collect_all<B>(
    paginator: &CursorPaginator<'_>,
    subjects: &[SubjectId],
    build_request: B,
) -> Collected
where
    B: Fn(&SubjectId, Cursor) -> RequestDescriptor,
{
    collect_with_limit(paginator, subjects, build_request, None).await
}

/// Like [`collect_all`], but a subject stops paging once `limit` records
/// have accumulated, truncated to exactly `limit`
pub async fn collect_up_to<B>(
    paginator: &CursorPaginator<'_>,
    subjects: &[SubjectId],
    build_request: B,
    limit: usize,
) -> Collected
where
    B: Fn(&SubjectId, Cursor) -> RequestDescriptor,
{
    collect_with_limit(paginator, subjects, build_request, Some(limit)).await
}

async fn collect_with_limit<B>(
    paginator: &CursorPaginator<'_>,
    subjects: &[SubjectId],
    build_request: B,
    limit: Option<usize>,
) -> Collected
where
    B: Fn(&SubjectId, Cursor) -> RequestDescriptor,
{
    let mut results: Collected = HashMap::new();

    paginator
        .paginate(subjects, build_request, |subject, page| match page {
            Err(err) => {
                // Terminal failure replaces the accumulation
                results.insert(subject.clone(), Err(err));
                false
            }
            Ok(records) => {
                let entry = results
                    .entry(subject.clone())
                    .or_insert_with(|| Ok(Vec::new()));
                let Ok(accumulated) = entry else {
                    return false;
                };
                accumulated.extend(records);
                debug!(subject = %subject, total = accumulated.len(), "records accumulated");

                match limit {
                    Some(max) if accumulated.len() >= max => {
                        accumulated.truncate(max);
                        false
                    }
                    _ => true,
                }
            }
        })
        .await;

    results
}
