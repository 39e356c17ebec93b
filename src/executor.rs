//! Execution strategies for dispatched requests.
//!
//! One resolved boolean selects between two strategies behind the
//! [`Executor`] trait: [`BlockingExecutor`] completes the transport round
//! trip and invokes the caller's callbacks before its handle is returned,
//! while [`NonBlockingExecutor`] spawns the round trip and wires the
//! callbacks into the handle's done/fail channels. Both return a
//! [`RequestHandle`] that accepts further attachments.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::handle::{CallOutcome, RequestHandle};
use crate::request::{FailureHandler, SuccessHandler};
use crate::transport::{Transport, TransportRequest};

/// One request execution strategy.
#[async_trait]
pub(crate) trait Executor: Send + Sync {
    async fn run(
        &self,
        transport: Arc<dyn Transport>,
        request: TransportRequest,
        on_success: SuccessHandler,
        on_failure: FailureHandler,
    ) -> RequestHandle;
}

/// Synchronous strategy: the verb's future resolves only after the
/// transport call finished and the callbacks ran.
pub(crate) struct BlockingExecutor;

#[async_trait]
impl Executor for BlockingExecutor {
    async fn run(
        &self,
        transport: Arc<dyn Transport>,
        request: TransportRequest,
        on_success: SuccessHandler,
        on_failure: FailureHandler,
    ) -> RequestHandle {
        let outcome = perform(transport.as_ref(), &request).await;
        match &outcome {
            CallOutcome::Success { data, status, body } => on_success(data, *status, body),
            CallOutcome::Failure {
                error,
                status,
                body,
            } => on_failure(error, *status, body),
        }
        RequestHandle::settled_with(outcome)
    }
}

/// Asynchronous strategy: the call is spawned and the handle is returned
/// immediately with the callbacks attached to its done/fail channels.
pub(crate) struct NonBlockingExecutor;

#[async_trait]
impl Executor for NonBlockingExecutor {
    async fn run(
        &self,
        transport: Arc<dyn Transport>,
        request: TransportRequest,
        on_success: SuccessHandler,
        on_failure: FailureHandler,
    ) -> RequestHandle {
        let handle = RequestHandle::pending();
        handle.done(on_success).fail(on_failure);

        let settler = handle.clone();
        tokio::spawn(async move {
            let outcome = perform(transport.as_ref(), &request).await;
            settler.settle(outcome);
        });

        handle
    }
}

/// Issues one transport call and folds the reply into a [`CallOutcome`].
async fn perform(transport: &dyn Transport, request: &TransportRequest) -> CallOutcome {
    match transport.dispatch(request).await {
        Ok(reply) if (200..300).contains(&reply.status) => {
            let data = parse_body(&reply.body);
            CallOutcome::Success {
                data,
                status: reply.status,
                body: reply.body,
            }
        }
        Ok(reply) => CallOutcome::Failure {
            error: format!("HTTP status {}", reply.status),
            status: reply.status,
            body: reply.body,
        },
        Err(error) => CallOutcome::Failure {
            error: error.to_string(),
            status: 0,
            body: String::new(),
        },
    }
}

/// Parses a reply body: empty bodies become `{}`, unparseable bodies `null`.
/// The raw text travels to the callbacks either way.
fn parse_body(body: &str) -> Value {
    if body.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(body).unwrap_or(Value::Null)
    }
}

/// Installs the log-only default when no success handler was supplied.
pub(crate) fn normalize_success(handler: Option<SuccessHandler>) -> SuccessHandler {
    handler.unwrap_or_else(|| {
        Box::new(|data, status, _raw| {
            tracing::info!(status, %data, "REST call completed without a success handler");
        })
    })
}

/// Installs the log-only default when no failure handler was supplied.
pub(crate) fn normalize_failure(handler: Option<FailureHandler>) -> FailureHandler {
    handler.unwrap_or_else(|| {
        Box::new(|error, status, _raw| {
            tracing::error!(status, error, "REST call failed without a failure handler");
        })
    })
}
