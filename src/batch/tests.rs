//! Tests for the batch execution module

use super::*;
use crate::config::EngineConfig;
use crate::error::{Error, TerminalError};
use crate::http::{RawResponse, Transport};
use crate::request::RequestDescriptor;
use crate::types::SubjectId;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config() -> EngineConfig {
    EngineConfig::builder()
        .backoff_unit(Duration::from_millis(1))
        .build()
}

fn executor_for(server: &MockServer) -> (BatchExecutor, String) {
    let transport = Arc::new(crate::http::ReqwestTransport::new(&fast_config()));
    (
        BatchExecutor::new(transport, fast_config()),
        server.uri(),
    )
}

// ============================================================================
// Backoff
// ============================================================================

#[test_case(0, 0; "zeroth")]
#[test_case(1, 1; "first")]
#[test_case(2, 4; "second")]
#[test_case(3, 9; "third")]
#[test_case(10, 100; "tenth")]
fn test_quadratic_backoff(attempts: u32, expected_units: u64) {
    let unit = Duration::from_millis(50);
    assert_eq!(
        quadratic_backoff(unit, attempts),
        unit * expected_units as u32
    );
}

#[test]
fn test_quadratic_backoff_monotonic() {
    let unit = Duration::from_millis(1);
    let mut previous = Duration::ZERO;
    for attempts in 1..=20 {
        let delay = quadratic_backoff(unit, attempts);
        assert!(delay >= previous);
        previous = delay;
    }
}

// ============================================================================
// Classification via wiremock
// ============================================================================

#[tokio::test]
async fn test_execute_covers_every_subject_exactly_once() {
    let mock_server = MockServer::start().await;

    for name in ["alice", "bob", "carol"] {
        Mock::given(method("GET"))
            .and(path(format!("/users/{name}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "screen_name": name })),
            )
            .mount(&mock_server)
            .await;
    }

    let (executor, base) = executor_for(&mock_server);
    let subjects: Vec<SubjectId> = ["alice", "bob", "carol"]
        .iter()
        .map(|&n| SubjectId::from(n))
        .collect();

    let outcomes = executor
        .execute(&subjects, |subject| {
            RequestDescriptor::new(format!("{base}/users/{subject}")).unwrap()
        })
        .await;

    assert_eq!(outcomes.len(), 3);
    for subject in &subjects {
        let outcome = outcomes.get(subject).expect("subject missing from output");
        assert!(outcome.is_success());
    }
}

#[tokio::test]
async fn test_terminal_401_does_not_affect_other_subjects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/locked"))
        .respond_with(ResponseTemplate::new(401).set_body_string("denied"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let (executor, base) = executor_for(&mock_server);
    let subjects = vec![SubjectId::from("locked"), SubjectId::from("open")];

    let outcomes = executor
        .execute(&subjects, |subject| {
            RequestDescriptor::new(format!("{base}/users/{subject}")).unwrap()
        })
        .await;

    assert_eq!(
        outcomes[&SubjectId::from("locked")].failure(),
        Some(&TerminalError::unauthorized(401, "denied"))
    );
    assert!(outcomes[&SubjectId::from("open")].is_success());
}

#[tokio::test]
async fn test_terminal_404_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (executor, base) = executor_for(&mock_server);
    let subjects = vec![SubjectId::from("ghost")];

    let outcomes = executor
        .execute(&subjects, |subject| {
            RequestDescriptor::new(format!("{base}/users/{subject}")).unwrap()
        })
        .await;

    assert_eq!(
        outcomes[&SubjectId::from("ghost")].failure(),
        Some(&TerminalError::not_found(404, "no such user"))
    );
}

#[tokio::test]
async fn test_retryable_500_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let (executor, base) = executor_for(&mock_server);
    let subjects = vec![SubjectId::Id(1)];

    let outcomes = executor
        .execute(&subjects, |_| {
            RequestDescriptor::new(format!("{base}/flaky")).unwrap()
        })
        .await;

    assert!(outcomes[&SubjectId::Id(1)].is_success());
}

#[tokio::test]
async fn test_malformed_body_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let (executor, base) = executor_for(&mock_server);
    let subjects = vec![SubjectId::Id(1)];

    let outcomes = executor
        .execute(&subjects, |_| {
            RequestDescriptor::new(format!("{base}/garbled")).unwrap()
        })
        .await;

    assert!(outcomes[&SubjectId::Id(1)].is_success());
}

#[tokio::test]
async fn test_unclassified_status_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(418))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let (executor, base) = executor_for(&mock_server);
    let subjects = vec![SubjectId::Id(1)];

    let outcomes = executor
        .execute(&subjects, |_| {
            RequestDescriptor::new(format!("{base}/teapot")).unwrap()
        })
        .await;

    assert!(outcomes[&SubjectId::Id(1)].is_success());
}

#[tokio::test]
async fn test_retry_ceiling_resolves_to_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3) // first attempt + two retries
        .mount(&mock_server)
        .await;

    let config = EngineConfig::builder()
        .backoff_unit(Duration::from_millis(1))
        .max_retries(2)
        .build();
    let transport = Arc::new(crate::http::ReqwestTransport::new(&config));
    let executor = BatchExecutor::new(transport, config);
    let base = mock_server.uri();
    let subjects = vec![SubjectId::Id(1)];

    let outcomes = executor
        .execute(&subjects, |_| {
            RequestDescriptor::new(format!("{base}/down")).unwrap()
        })
        .await;

    match outcomes[&SubjectId::Id(1)].failure() {
        Some(TerminalError::RetriesExhausted {
            attempts,
            last_failure,
        }) => {
            assert_eq!(*attempts, 3);
            assert_eq!(last_failure, "HTTP 502");
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_counts_as_retryable() {
    // Nothing listens on the discard port; every attempt is a connect error
    let config = EngineConfig::builder()
        .backoff_unit(Duration::from_millis(1))
        .max_retries(1)
        .build();
    let transport = Arc::new(crate::http::ReqwestTransport::new(&config));
    let executor = BatchExecutor::new(transport, config);
    let subjects = vec![SubjectId::Id(1)];

    let outcomes = executor
        .execute(&subjects, |_| {
            RequestDescriptor::new("http://127.0.0.1:9/unreachable").unwrap()
        })
        .await;

    match outcomes[&SubjectId::Id(1)].failure() {
        Some(TerminalError::RetriesExhausted { last_failure, .. }) => {
            assert!(last_failure.starts_with("transport failure"));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

// ============================================================================
// Concurrency cap via a counting transport
// ============================================================================

/// Transport that records how many calls overlap
struct CountingTransport {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl Transport for CountingTransport {
    async fn perform(&self, _request: &RequestDescriptor) -> crate::error::Result<RawResponse> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(RawResponse::new(200, &b"{}"[..]))
    }
}

#[tokio::test]
async fn test_concurrency_cap_is_respected() {
    let transport = Arc::new(CountingTransport {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let config = EngineConfig::builder().concurrency_limit(3).build();
    let executor = BatchExecutor::new(Arc::clone(&transport) as Arc<dyn Transport>, config);

    let subjects: Vec<SubjectId> = (0..12).map(SubjectId::Id).collect();
    let outcomes = executor
        .execute(&subjects, |subject| {
            RequestDescriptor::new(format!("http://localhost/{subject}")).unwrap()
        })
        .await;

    assert_eq!(outcomes.len(), 12);
    assert!(transport.peak.load(Ordering::SeqCst) <= 3);
}

// ============================================================================
// Backoff releases the concurrency slot
// ============================================================================

/// Transport that fails a scripted number of times per URL
struct FlakyTransport {
    remaining_failures: Mutex<HashMap<String, u32>>,
}

#[async_trait]
impl Transport for FlakyTransport {
    async fn perform(&self, request: &RequestDescriptor) -> crate::error::Result<RawResponse> {
        let mut remaining = self.remaining_failures.lock().unwrap();
        let left = remaining.entry(request.target().to_string()).or_insert(0);
        if *left > 0 {
            *left -= 1;
            return Ok(RawResponse::new(500, &b""[..]));
        }
        Ok(RawResponse::new(200, &b"{\"ok\":true}"[..]))
    }
}

#[tokio::test]
async fn test_backing_off_request_does_not_hold_a_slot() {
    // One subject fails repeatedly with long backoff; with a cap of 1 the
    // other subjects can only finish if the sleeper releases its permit.
    let mut failures = HashMap::new();
    failures.insert("http://localhost/0".to_string(), 2);
    let transport = Arc::new(FlakyTransport {
        remaining_failures: Mutex::new(failures),
    });

    let config = EngineConfig::builder()
        .concurrency_limit(1)
        .backoff_unit(Duration::from_millis(30))
        .build();
    let executor = BatchExecutor::new(transport, config);

    let subjects: Vec<SubjectId> = (0..4).map(SubjectId::Id).collect();
    let started = std::time::Instant::now();
    let outcomes = executor
        .execute(&subjects, |subject| {
            RequestDescriptor::new(format!("http://localhost/{subject}")).unwrap()
        })
        .await;

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.values().all(BatchOutcome::is_success));
    // Sleeps were 30ms + 120ms; if they had pinned the only slot the rest
    // of the wave would still have finished, but well past this bound.
    assert!(started.elapsed() < Duration::from_secs(5));
}

// ============================================================================
// Scripted retry sequences
// ============================================================================

/// Transport that replays a queue of responses per URL
struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<RawResponse>>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn script(&self, url: &str, responses: Vec<RawResponse>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), responses.into());
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn perform(&self, request: &RequestDescriptor) -> crate::error::Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts
            .get_mut(request.target().as_str())
            .ok_or_else(|| Error::other(format!("no script for {}", request.target())))?;
        queue
            .pop_front()
            .ok_or_else(|| Error::other("script exhausted"))
    }
}

#[tokio::test]
async fn test_attempt_counter_is_per_request() {
    // Subject 1 needs two retries, subject 2 none. If the counter were
    // shared, subject 2's success would reset subject 1's backoff state or
    // subject 1's failures would inflate subject 2's attempts.
    let transport = Arc::new(ScriptedTransport::new());
    transport.script(
        "http://localhost/1",
        vec![
            RawResponse::new(500, &b""[..]),
            RawResponse::new(502, &b""[..]),
            RawResponse::new(200, &b"{\"n\":1}"[..]),
        ],
    );
    transport.script(
        "http://localhost/2",
        vec![RawResponse::new(200, &b"{\"n\":2}"[..])],
    );

    let config = EngineConfig::builder()
        .backoff_unit(Duration::from_millis(1))
        .max_retries(2)
        .build();
    let executor = BatchExecutor::new(Arc::clone(&transport) as Arc<dyn Transport>, config);

    let subjects = vec![SubjectId::Id(1), SubjectId::Id(2)];
    let outcomes = executor
        .execute(&subjects, |subject| {
            RequestDescriptor::new(format!("http://localhost/{subject}")).unwrap()
        })
        .await;

    assert!(outcomes[&SubjectId::Id(1)].is_success());
    assert!(outcomes[&SubjectId::Id(2)].is_success());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
}
