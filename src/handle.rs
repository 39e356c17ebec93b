//! Deferred-style request handles.
//!
//! Every verb call returns a [`RequestHandle`] regardless of execution
//! mode. The handle supports both usage styles of the request layer:
//! callback attachment via [`done`](RequestHandle::done) /
//! [`fail`](RequestHandle::fail) (late attachments on a settled handle fire
//! immediately), and completion-based usage via
//! [`settled`](RequestHandle::settled). A handle settles exactly once and
//! offers no cancellation.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio::sync::watch;

use crate::request::{FailureHandler, SuccessHandler};

/// The settled result of one request.
#[derive(Clone, Debug, PartialEq)]
pub enum CallOutcome {
    /// The transport reported a 2xx response.
    Success {
        /// Response body parsed as JSON (`{}` for an empty body, `null`
        /// when unparseable).
        data: Value,
        /// HTTP status code.
        status: u16,
        /// Raw response text.
        body: String,
    },
    /// The transport reported a non-2xx response or no response at all.
    Failure {
        /// Error description.
        error: String,
        /// HTTP status code, 0 when no response was received.
        status: u16,
        /// Raw error text.
        body: String,
    },
}

impl CallOutcome {
    /// True for the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The HTTP status code carried by either variant.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }
}

#[derive(Default)]
struct State {
    outcome: Option<CallOutcome>,
    done: Vec<SuccessHandler>,
    fail: Vec<FailureHandler>,
}

struct Shared {
    state: Mutex<State>,
    seal: watch::Sender<bool>,
}

/// Opaque handle to an in-flight or completed request.
///
/// Cloning is cheap and every clone observes the same settlement.
#[derive(Clone)]
pub struct RequestHandle {
    shared: Arc<Shared>,
}

// Verify RequestHandle is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestHandle>();
};

impl RequestHandle {
    /// Creates an unsettled handle.
    pub(crate) fn pending() -> Self {
        let (seal, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                seal,
            }),
        }
    }

    /// Creates a handle that is already settled with `outcome`.
    pub(crate) fn settled_with(outcome: CallOutcome) -> Self {
        let handle = Self::pending();
        handle.settle(outcome);
        handle
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a callback panicked; the state itself
        // is still coherent.
        self.shared
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Settles the handle, invoking the matching registered callbacks.
    /// Later settle attempts are ignored.
    pub(crate) fn settle(&self, outcome: CallOutcome) {
        let (done, fail) = {
            let mut state = self.state();
            if state.outcome.is_some() {
                return;
            }
            state.outcome = Some(outcome.clone());
            (
                std::mem::take(&mut state.done),
                std::mem::take(&mut state.fail),
            )
        };

        // Callbacks run outside the lock so they may touch the handle.
        match &outcome {
            CallOutcome::Success { data, status, body } => {
                for callback in done {
                    callback(data, *status, body);
                }
            }
            CallOutcome::Failure {
                error,
                status,
                body,
            } => {
                for callback in fail {
                    callback(error, *status, body);
                }
            }
        }

        self.shared.seal.send_replace(true);
    }

    /// Registers a success callback.
    ///
    /// Fires immediately when the handle already settled successfully; is
    /// dropped uninvoked when the handle settled with a failure.
    pub fn done<F>(&self, handler: F) -> &Self
    where
        F: FnOnce(&Value, u16, &str) + Send + 'static,
    {
        let settled = {
            let mut state = self.state();
            if let Some(outcome) = state.outcome.clone() {
                Some((handler, outcome))
            } else {
                state.done.push(Box::new(handler));
                None
            }
        };
        if let Some((handler, CallOutcome::Success { data, status, body })) = settled {
            handler(&data, status, &body);
        }
        self
    }

    /// Registers a failure callback.
    ///
    /// Fires immediately when the handle already settled with a failure; is
    /// dropped uninvoked when the handle settled successfully.
    pub fn fail<F>(&self, handler: F) -> &Self
    where
        F: FnOnce(&str, u16, &str) + Send + 'static,
    {
        let settled = {
            let mut state = self.state();
            if let Some(outcome) = state.outcome.clone() {
                Some((handler, outcome))
            } else {
                state.fail.push(Box::new(handler));
                None
            }
        };
        if let Some((
            handler,
            CallOutcome::Failure {
                error,
                status,
                body,
            },
        )) = settled
        {
            handler(&error, status, &body);
        }
        self
    }

    /// Non-blocking peek at the settled outcome.
    #[must_use]
    pub fn outcome(&self) -> Option<CallOutcome> {
        self.state().outcome.clone()
    }

    /// True once the request completed (either way).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state().outcome.is_some()
    }

    /// Waits until the request completes and returns its outcome.
    pub async fn settled(&self) -> CallOutcome {
        let mut sealed = self.shared.seal.subscribe();
        // The sender lives inside our own Arc, so the channel cannot close
        // before this handle is dropped.
        let _ = sealed.wait_for(|done| *done).await;
        self.outcome().expect("handle sealed without an outcome")
    }
}

impl std::fmt::Debug for RequestHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHandle")
            .field("outcome", &self.outcome())
            .finish()
    }
}
