//! High-level engine facade
//!
//! [`FetchEngine`] wires the transport, executor, and paginator together
//! behind one configured surface: single batched waves, callback-driven
//! pagination, and the aggregating entry points.

use crate::aggregate::{self, Collected};
use crate::batch::{BatchExecutor, BatchOutcome};
use crate::config::EngineConfig;
use crate::http::{ReqwestTransport, Transport};
use crate::pagination::{CursorPaginator, PageResult, PageShape};
use crate::request::RequestDescriptor;
use crate::types::{Cursor, SubjectId};
use std::collections::HashMap;
use std::sync::Arc;

/// High-level client for batched, cursor-paginated API fetching
pub struct FetchEngine {
    executor: BatchExecutor,
}

impl FetchEngine {
    /// Engine with the production HTTP transport
    pub fn new(config: EngineConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(&config));
        Self::with_transport(transport, config)
    }

    /// Engine over a caller-supplied transport (tests, instrumentation)
    pub fn with_transport(transport: Arc<dyn Transport>, config: EngineConfig) -> Self {
        Self {
            executor: BatchExecutor::new(transport, config),
        }
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &EngineConfig {
        self.executor.config()
    }

    /// One bounded-concurrency wave: every subject resolves to a success
    /// or a terminal failure
    pub async fn execute<B>(
        &self,
        subjects: &[SubjectId],
        build_request: B,
    ) -> HashMap<SubjectId, BatchOutcome>
    where
        B: Fn(&SubjectId) -> RequestDescriptor,
    {
        self.executor.execute(subjects, build_request).await
    }

    /// Cursor pagination with a per-subject continuation decision
    pub async fn paginate<B, F>(
        &self,
        subjects: &[SubjectId],
        shape: PageShape,
        build_request: B,
        on_page: F,
    ) where
        B: Fn(&SubjectId, Cursor) -> RequestDescriptor,
        F: FnMut(&SubjectId, PageResult) -> bool,
    {
        CursorPaginator::new(&self.executor, shape)
            .paginate(subjects, build_request, on_page)
            .await;
    }

    /// Every page for every subject, concatenated per subject
    pub async fn collect_all<B>(
        &self,
        subjects: &[SubjectId],
        shape: PageShape,
        build_request: B,
    ) -> Collected
    where
        B: Fn(&SubjectId, Cursor) -> RequestDescriptor,
    {
        let paginator = CursorPaginator::new(&self.executor, shape);
        aggregate::collect_all(&paginator, subjects, build_request).await
    }

    /// Pages for every subject until `limit` records have accumulated for
    /// that subject
    pub async fn collect_up_to<B>(
        &self,
        subjects: &[SubjectId],
        shape: PageShape,
        build_request: B,
        limit: usize,
    ) -> Collected
    where
        B: Fn(&SubjectId, Cursor) -> RequestDescriptor,
    {
        let paginator = CursorPaginator::new(&self.executor, shape);
        aggregate::collect_up_to(&paginator, subjects, build_request, limit).await
    }
}
