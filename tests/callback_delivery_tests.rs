//! Integration tests for callback and handle delivery semantics.
//!
//! These tests verify that the two delivery styles (direct callbacks in
//! synchronous mode, done/fail channels in asynchronous mode) deliver the
//! same arguments, that late attachments on settled handles fire
//! immediately, and that failures surface through side channels only.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use deferred_rest::{CallOutcome, CallParams, RestClient};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with(status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

// ============================================================================
// Sync/async delivery parity
// ============================================================================

#[tokio::test]
async fn test_sync_mode_runs_callbacks_before_returning() {
    let server = server_with(201, json!({"id": 1})).await;
    let client = RestClient::new(server.uri(), None);

    let captured = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&captured);
    client
        .create(
            "/orders",
            json!({"id": 1}),
            CallParams::new().success(move |data, status, _raw| {
                *slot.lock().unwrap() = Some((data.clone(), status));
            }),
        )
        .await;

    // No settled().await needed: sync mode already delivered.
    assert_eq!(
        captured.lock().unwrap().take(),
        Some((json!({"id": 1}), 201))
    );
}

#[tokio::test]
async fn test_async_mode_delivers_the_same_arguments() {
    let server = server_with(201, json!({"id": 1})).await;
    let client = RestClient::new(server.uri(), None);

    let captured = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&captured);
    let handle = client
        .create(
            "/orders",
            json!({"id": 1}),
            CallParams::new()
                .asynchronous(true)
                .success(move |data, status, _raw| {
                    *slot.lock().unwrap() = Some((data.clone(), status));
                }),
        )
        .await;

    handle.settled().await;
    assert_eq!(
        captured.lock().unwrap().take(),
        Some((json!({"id": 1}), 201))
    );
}

// ============================================================================
// Handle attachment
// ============================================================================

#[tokio::test]
async fn test_done_attached_after_sync_completion_fires_immediately() {
    let server = server_with(200, json!({"ok": true})).await;
    let client = RestClient::new(server.uri(), None);

    let handle = client
        .create("/orders", json!({"id": 1}), CallParams::new())
        .await;
    assert!(handle.is_settled());

    let fired = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&fired);
    handle.done(move |data, status, _raw| {
        assert_eq!(data, &json!({"ok": true}));
        assert_eq!(status, 200);
        seen.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_handles_accept_attachment_in_both_modes() {
    let server = server_with(200, json!({})).await;
    let client = RestClient::new(server.uri(), None);

    let fired = Arc::new(AtomicU32::new(0));

    let sync_handle = client
        .create("/orders", json!({"id": 1}), CallParams::new())
        .await;
    let seen = Arc::clone(&fired);
    sync_handle.done(move |_, _, _| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let async_handle = client
        .create(
            "/orders",
            json!({"id": 1}),
            CallParams::new().asynchronous(true),
        )
        .await;
    let seen = Arc::clone(&fired);
    async_handle.done(move |_, _, _| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    async_handle.settled().await;

    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Failure semantics
// ============================================================================

#[tokio::test]
async fn test_http_failure_routes_to_fail_channel_only() {
    let server = server_with(500, json!({"error": "boom"})).await;
    let client = RestClient::new(server.uri(), None);

    let handle = client
        .create(
            "/orders",
            json!({"id": 1}),
            CallParams::new()
                .success(|_, _, _| panic!("success must not fire for a 500"))
                .asynchronous(true),
        )
        .await;

    let failures = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&failures);
    handle.fail(move |error, status, _raw| {
        assert_eq!(error, "HTTP status 500");
        assert_eq!(status, 500);
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let outcome = handle.settled().await;
    assert!(!outcome.is_success());
    assert_eq!(failures.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_without_handlers_is_swallowed_not_raised() {
    let server = server_with(500, json!({"error": "boom"})).await;
    let client = RestClient::new(server.uri(), None);

    // No callbacks at all: the default failure handler logs and swallows.
    let handle = client
        .create("/orders", json!({"id": 1}), CallParams::new())
        .await;

    match handle.settled().await {
        CallOutcome::Failure { status, .. } => assert_eq!(status, 500),
        CallOutcome::Success { .. } => panic!("expected a failure outcome"),
    }
}

#[tokio::test]
async fn test_unusable_base_url_fails_with_status_zero() {
    let client = RestClient::new("not a base url", None);

    let captured = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&captured);
    let handle = client
        .read(
            "/orders",
            CallParams::new()
                .asynchronous(false)
                .error(move |error, status, _raw| {
                    *slot.lock().unwrap() = Some((error.to_string(), status));
                }),
        )
        .await;

    assert!(handle.is_settled());
    let (error, status) = captured.lock().unwrap().take().unwrap();
    assert_eq!(status, 0);
    assert!(error.contains("Invalid request URL"));
}

#[tokio::test]
async fn test_unparseable_success_body_delivers_null_data_with_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    let client = RestClient::new(server.uri(), None);

    let captured = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&captured);
    client
        .read(
            "/orders",
            CallParams::new()
                .asynchronous(false)
                .success(move |data, _status, raw| {
                    *slot.lock().unwrap() = Some((data.clone(), raw.to_string()));
                }),
        )
        .await;

    let (data, raw) = captured.lock().unwrap().take().unwrap();
    assert_eq!(data, serde_json::Value::Null);
    assert_eq!(raw, "<html>not json</html>");
}
