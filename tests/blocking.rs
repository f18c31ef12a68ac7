//! The blocking client shares the async client's behavior. Each test drives
//! it from `spawn_blocking`, since reqwest's blocking client must not run on
//! an async worker thread.

mod common;

use common::{memory_json, status_json, API_KEY};
use memoryrelay::{blocking, ErrorKind, NewMemory, PollOptions, SearchQuery};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn blocking_client(uri: String) -> blocking::Client {
    blocking::Client::builder()
        .api_key(API_KEY)
        .base_url(uri)
        .backoff_base(Duration::from_millis(50))
        .build_blocking()
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_create_and_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/memories"))
        .and(header("x-api-key", API_KEY))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(memory_json("mem_1", "likes tea", "agent-1")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/memories/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"memory": memory_json("mem_1", "likes tea", "agent-1"), "score": 0.88}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let (memory, hits) = tokio::task::spawn_blocking(move || {
        let client = blocking_client(uri);
        let memory = client
            .memories()
            .create(NewMemory::new("likes tea", "agent-1"))
            .unwrap();
        let hits = client.memories().search(SearchQuery::new("tea")).unwrap();
        (memory, hits)
    })
    .await
    .unwrap();

    assert_eq!(memory.id, "mem_1");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 0.88);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_retries_with_backoff() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/v1/memories/mem_1"))
        .respond_with(move |_req: &wiremock::Request| {
            if attempt_count_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                ResponseTemplate::new(500)
            } else {
                ResponseTemplate::new(200).set_body_json(memory_json("mem_1", "hello", "agent-1"))
            }
        })
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let (memory, elapsed) = tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let memory = blocking_client(uri).memories().get("mem_1").unwrap();
        (memory, start.elapsed())
    })
    .await
    .unwrap();

    assert_eq!(memory.id, "mem_1");
    assert_eq!(attempt_count.load(Ordering::SeqCst), 3);
    // 50ms then 100ms of backoff
    assert!(elapsed >= Duration::from_millis(150));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_non_retryable_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API key"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let err = tokio::task::spawn_blocking(move || blocking_client(uri).health())
        .await
        .unwrap()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.message(), "Invalid API key");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_wait_for_ready() {
    let mock_server = MockServer::start().await;
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_clone = polls.clone();

    Mock::given(method("GET"))
        .and(path("/v2/memories/mem_1/status"))
        .respond_with(move |_req: &wiremock::Request| {
            let status = if polls_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                "processing"
            } else {
                "ready"
            };
            ResponseTemplate::new(200).set_body_json(status_json("mem_1", status))
        })
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/memories/mem_1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(memory_json("mem_1", "notes", "agent-1")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let memory = tokio::task::spawn_blocking(move || {
        blocking_client(uri).memories().wait_for_ready(
            "mem_1",
            PollOptions::new(Duration::from_secs(5), Duration::from_millis(10)),
        )
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(memory.id, "mem_1");
    assert_eq!(polls.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_wait_for_ready_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/memories/mem_1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_json("mem_1", "pending")))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let (result, elapsed) = tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let result = blocking_client(uri).memories().wait_for_ready(
            "mem_1",
            PollOptions::new(Duration::from_millis(500), Duration::from_millis(100)),
        );
        (result, start.elapsed())
    })
    .await
    .unwrap();

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.message().contains("not ready after"));
    assert!(elapsed >= Duration::from_millis(500));
}

#[test]
fn test_blocking_validation_needs_no_server() {
    // Port 1 is never contacted: validation fails first
    let client = blocking_client("http://127.0.0.1:1".to_string());

    let err = client
        .memories()
        .create(NewMemory::new("", "agent-1"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.message().contains("cannot be empty"));
}
