//! The per-subject pagination loop

use super::types::{decode_page, PageShape};
use crate::batch::{BatchExecutor, BatchOutcome};
use crate::request::RequestDescriptor;
use crate::types::{Cursor, SubjectId, CURSOR_DONE, CURSOR_START};
use std::collections::HashMap;
use tracing::debug;

/// Drives cursor pagination for a set of subjects over repeated waves.
///
/// Every subject starts at cursor -1. Each round issues one wave for all
/// still-active subjects; a subject leaves the round either with a new
/// cursor (more pages, callback said continue) or finished (cursor 0,
/// empty page, terminal failure, or callback said stop). One subject
/// finishing never stalls or accelerates another.
pub struct CursorPaginator<'a> {
    executor: &'a BatchExecutor,
    shape: PageShape,
}

impl<'a> CursorPaginator<'a> {
    /// Create a paginator over an executor
    pub fn new(executor: &'a BatchExecutor, shape: PageShape) -> Self {
        Self { executor, shape }
    }

    /// Fetch pages for every subject until each is exhausted or aborted.
    ///
    /// `build_request` receives the subject and its current cursor, which
    /// must be echoed into the request verbatim. `on_page` observes every
    /// page (or the terminal failure ending a subject) and returns whether
    /// to fetch another page for that subject; its answer is ignored when
    /// the subject is already finished (empty page, terminal failure, or
    /// an exhausted cursor).
    pub async fn paginate<B, F>(&self, subjects: &[SubjectId], build_request: B, mut on_page: F)
    where
        B: Fn(&SubjectId, Cursor) -> RequestDescriptor,
        F: FnMut(&SubjectId, super::PageResult) -> bool,
    {
        let mut cursors: HashMap<SubjectId, Cursor> = subjects
            .iter()
            .map(|subject| (subject.clone(), CURSOR_START))
            .collect();

        while !cursors.is_empty() {
            let active: Vec<SubjectId> = cursors.keys().cloned().collect();
            debug!(active = active.len(), "pagination round");

            let outcomes = self
                .executor
                .execute(&active, |subject| {
                    let cursor = cursors.get(subject).copied().unwrap_or(CURSOR_START);
                    build_request(subject, cursor)
                })
                .await;

            for (subject, outcome) in outcomes {
                let next = match outcome {
                    BatchOutcome::Success(body) => {
                        let page = decode_page(&body, &self.shape);
                        if page.records.is_empty() {
                            // Let the caller observe the end of the data
                            on_page(&subject, Ok(Vec::new()));
                            CURSOR_DONE
                        } else if on_page(&subject, Ok(page.records)) {
                            page.next_cursor
                        } else {
                            CURSOR_DONE
                        }
                    }
                    BatchOutcome::Failed(err) => {
                        on_page(&subject, Err(err));
                        CURSOR_DONE
                    }
                };

                if next == CURSOR_DONE {
                    cursors.remove(&subject);
                    debug!(subject = %subject, "pagination finished");
                } else {
                    cursors.insert(subject, next);
                }
            }
        }
    }
}
