//! # deferred-rest
//!
//! A deferred-style REST request layer: a small set of high-level verbs
//! (`create`, `read`, `update`, `remove`, `query`, `run_action`) translated
//! into normalized HTTP requests against a configurable base URL, with
//! uniform synchronous/asynchronous execution, URL-parameter composition,
//! and success/error callback normalization.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`RestClient`]: the verb methods, flag accessors, and seeded data store
//! - [`CallParams`]: per-call parameters with tri-state execution mode
//! - [`RequestHandle`]: deferred-style completion object with `done`/`fail`
//!   channels and awaitable settlement
//! - [`Transport`]: the consumed HTTP capability, implemented for
//!   production by [`HttpTransport`] and replaceable in tests
//!
//! It is deliberately *not* a full HTTP client: no retries, no
//! interceptors, no caching, no auth. Requests go out exactly as the verbs
//! resolve them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use deferred_rest::{CallParams, RestClient};
//! use serde_json::json;
//!
//! let client = RestClient::new("https://api.example.com/rs", None);
//!
//! // Synchronous by default: the success callback already ran.
//! client
//!     .create(
//!         "/orders",
//!         json!({"id": 1}),
//!         CallParams::new().success(|data, status, _raw| {
//!             println!("created {data} with status {status}");
//!         }),
//!     )
//!     .await;
//!
//! // Asynchronous by default: await the handle instead.
//! let handle = client
//!     .read("/orders", CallParams::new().url_parameters(["42"]))
//!     .await;
//! if let deferred_rest::CallOutcome::Success { data, .. } = handle.settled().await {
//!     println!("order: {data}");
//! }
//! ```
//!
//! ## Error handling
//!
//! The verbs never return errors and never panic on bad input. Contract
//! violations (a non-object `create` payload, a `remove` without URL
//! parameters) are logged at the fatal channel via `tracing` and the
//! request still goes out with best-effort defaults. Transport failures are
//! routed to the failure callback, or to a fatal-level log line when no
//! callback was supplied. Observe failures through callbacks, handles, or
//! log output, never through `Result` or unwinding.
//!
//! ## Design Principles
//!
//! - **One base URL per client**: set at construction, immutable after
//! - **Immutable request specs**: caller parameters are consumed, never
//!   mutated in place
//! - **Explicit execution modes**: per-verb defaults, overridable through a
//!   tri-state parameter resolved exactly once per call
//! - **Thread-safe**: `RestClient` and `RequestHandle` are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod client;
pub mod errors;
pub mod handle;
pub mod request;
pub mod transport;

mod executor;
mod path;

// Re-export public types at crate root for convenience
pub use client::RestClient;
pub use errors::TransportError;
pub use handle::{CallOutcome, RequestHandle};
pub use request::{CallParams, FailureHandler, HttpMethod, SuccessHandler};
pub use transport::{HttpTransport, Transport, TransportReply, TransportRequest, JSON_CONTENT_TYPE};
