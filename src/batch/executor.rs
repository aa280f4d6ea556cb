//! Bounded-concurrency wave execution with retry
//!
//! The executor fans one request per subject into a shared semaphore,
//! classifies each response, and drives retryable failures through
//! quadratic backoff until every subject has a final outcome. A request
//! releases its concurrency slot before backing off and re-acquires one to
//! resubmit, so a sleeping retry never starves the rest of the wave.

use super::types::{BatchOutcome, RetryReason};
use crate::config::EngineConfig;
use crate::error::TerminalError;
use crate::http::{RawResponse, Transport};
use crate::request::RequestDescriptor;
use crate::types::{JsonValue, SubjectId};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Issues one wave of concurrent requests and resolves every subject to a
/// success or a terminal failure before returning
pub struct BatchExecutor {
    transport: Arc<dyn Transport>,
    config: EngineConfig,
}

/// Per-response classification, internal to the executor
enum Classified {
    Success(JsonValue),
    Terminal(TerminalError),
    Retry(RetryReason),
}

impl BatchExecutor {
    /// Create an executor over a transport
    pub fn new(transport: Arc<dyn Transport>, config: EngineConfig) -> Self {
        Self { transport, config }
    }

    /// The configuration this executor runs with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one wave.
    ///
    /// Builds a request per subject via `build_request`, merges in the
    /// configured default headers, and submits everything under the
    /// concurrency cap. Returns once every subject has reached a final
    /// outcome; the key set of the result equals the input subjects, each
    /// exactly once. Outcomes carry no ordering guarantee.
    pub async fn execute<B>(
        &self,
        subjects: &[SubjectId],
        build_request: B,
    ) -> HashMap<SubjectId, BatchOutcome>
    where
        B: Fn(&SubjectId) -> RequestDescriptor,
    {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));

        let waves = subjects.iter().map(|subject| {
            let request = build_request(subject).headers(&self.config.default_headers);
            let semaphore = Arc::clone(&semaphore);
            async move {
                let outcome = self.drive(&request, &semaphore).await;
                (subject.clone(), outcome)
            }
        });

        join_all(waves).await.into_iter().collect()
    }

    /// Drive a single request to its final outcome, sleeping through
    /// retryable failures. The attempt counter is scoped to this request
    /// alone.
    async fn drive(&self, request: &RequestDescriptor, semaphore: &Semaphore) -> BatchOutcome {
        let mut attempts: u32 = 0;

        loop {
            let classified = {
                let _permit = semaphore.acquire().await.expect("semaphore never closed");
                match self.transport.perform(request).await {
                    Ok(response) => {
                        debug!(status = response.status, url = %request.target(), "response");
                        classify(&response)
                    }
                    Err(err) => Classified::Retry(RetryReason::Transport(err.to_string())),
                }
            };

            let reason = match classified {
                Classified::Success(value) => return BatchOutcome::Success(value),
                Classified::Terminal(err) => {
                    warn!(url = %request.target(), error = %err, "terminal failure");
                    return BatchOutcome::Failed(err);
                }
                Classified::Retry(reason) => reason,
            };

            attempts += 1;
            if let Some(max) = self.config.max_retries {
                if attempts > max {
                    warn!(url = %request.target(), attempts, "retry ceiling reached");
                    return BatchOutcome::Failed(TerminalError::RetriesExhausted {
                        attempts,
                        last_failure: reason.to_string(),
                    });
                }
            }

            let delay = quadratic_backoff(self.config.backoff_unit, attempts);
            warn!(
                url = %request.target(),
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                reason = %reason,
                "retrying after backoff"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Backoff before the Nth consecutive retry of one request: N² units
pub fn quadratic_backoff(unit: Duration, attempts: u32) -> Duration {
    unit * attempts.saturating_mul(attempts)
}

/// Classify a raw response into the executor's three-way outcome
fn classify(response: &RawResponse) -> Classified {
    match response.status {
        200..=299 => match serde_json::from_slice::<JsonValue>(&response.body) {
            Ok(value) => Classified::Success(value),
            Err(err) => Classified::Retry(RetryReason::MalformedBody(err.to_string())),
        },
        401 => Classified::Terminal(TerminalError::unauthorized(401, response.body_text())),
        404 => Classified::Terminal(TerminalError::not_found(404, response.body_text())),
        500 | 502 => Classified::Retry(RetryReason::ServerError(response.status)),
        other => Classified::Retry(RetryReason::Unclassified(other)),
    }
}
