//! The REST client: verb methods over one internal request path.
//!
//! [`RestClient`] owns a base endpoint, builds normalized requests from the
//! six high-level verbs, and returns a deferred-style
//! [`RequestHandle`] for every call. Input validation follows a
//! fail-loud-and-continue policy: contract violations are logged at the
//! fatal channel and the request still goes out with whatever the verb
//! itself implies.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::executor::{
    normalize_failure, normalize_success, BlockingExecutor, Executor, NonBlockingExecutor,
};
use crate::handle::RequestHandle;
use crate::path;
use crate::request::{verb_defaults, CallParams, HttpMethod, RequestSpec};
use crate::transport::{HttpTransport, Transport, TransportRequest, JSON_CONTENT_TYPE};

/// Deferred-style REST client bound to one base URL.
///
/// A client is created once and reused for the application's lifetime; each
/// verb call builds an ephemeral request and returns an independent handle.
/// Beyond the immutable base URL the only client state is the
/// refresh-after-navigate flag (a plain marker consumers may poll and set;
/// it has no effect on requests) and the optional seeded data store.
///
/// # Execution modes
///
/// Every verb accepts a tri-state execution-mode override. Left unset,
/// `create`/`update`/`remove` run synchronously (the call's future resolves
/// after the callbacks ran) while `read`/`query`/`run_action` run
/// asynchronously (the handle is returned as soon as the call is spawned).
/// Either way the returned handle accepts further `done`/`fail`
/// attachments.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async
/// tasks.
///
/// # Example
///
/// ```rust,ignore
/// use deferred_rest::{CallParams, RestClient};
/// use serde_json::json;
///
/// let client = RestClient::new("https://api.example.com/rs", None);
///
/// // POST, synchronous by default: callbacks ran before this returns.
/// client
///     .create(
///         "/orders",
///         json!({"id": 1}),
///         CallParams::new().success(|data, status, _raw| {
///             println!("created: {data} ({status})");
///         }),
///     )
///     .await;
///
/// // GET, asynchronous by default: await the handle for the outcome.
/// let handle = client
///     .read("/orders", CallParams::new().url_parameters(["42"]))
///     .await;
/// let outcome = handle.settled().await;
/// ```
pub struct RestClient {
    base_url: String,
    refresh_after_navigate: AtomicBool,
    store: RwLock<Value>,
    transport: Arc<dyn Transport>,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a client for the given base URL, dispatching over
    /// [`HttpTransport`].
    ///
    /// `initial_data` seeds the client's data store when it is a JSON
    /// object (compatibility with the generic data-model base the client
    /// composes with); it has no effect on request building.
    #[must_use]
    pub fn new(base_url: impl Into<String>, initial_data: Option<Value>) -> Self {
        Self::with_transport(base_url, initial_data, Arc::new(HttpTransport::new()))
    }

    /// Creates a client dispatching over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(
        base_url: impl Into<String>,
        initial_data: Option<Value>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let store = match initial_data {
            Some(data) if data.is_object() => data,
            _ => Value::Null,
        };

        Self {
            base_url: base_url.into(),
            refresh_after_navigate: AtomicBool::new(false),
            store: RwLock::new(store),
            transport,
        }
    }

    /// Returns the base URL all relative paths resolve against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs an HTTP POST to the given path, creating an entry.
    ///
    /// `data` must be a JSON object; anything else is logged at the fatal
    /// channel and the POST goes out without a body. Recognized `params`
    /// fields: `absolute_url`, `success`, `error`, `asynchronous`
    /// (default: synchronous).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// client
    ///     .create("/orders", json!({"id": 1}), CallParams::new())
    ///     .await;
    /// ```
    pub async fn create(&self, path: &str, data: Value, params: CallParams) -> RequestHandle {
        let body = if data.is_object() {
            Some(data)
        } else {
            tracing::error!("create expects an object payload");
            None
        };

        self.execute(RequestSpec {
            path: path.to_string(),
            method: HttpMethod::Post,
            absolute: params.absolute_url,
            url_parameters: Vec::new(),
            body,
            asynchronous: params.asynchronous.unwrap_or(verb_defaults::CREATE_ASYNC),
            on_success: params.success,
            on_failure: params.error,
        })
        .await
    }

    /// Performs an HTTP GET for the given path.
    ///
    /// The requested data is delivered through the success callback and the
    /// handle; nothing is stored on the client. `params.url_parameters`
    /// are appended to the path as segments in the given order. Recognized
    /// `params` fields: `absolute_url`, `url_parameters`, `success`,
    /// `error`, `asynchronous` (default: asynchronous).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// // GET {base}/orders/42
    /// let handle = client
    ///     .read("/orders", CallParams::new().url_parameters(["42"]))
    ///     .await;
    /// ```
    pub async fn read(&self, path: &str, params: CallParams) -> RequestHandle {
        self.execute(RequestSpec {
            path: path.to_string(),
            method: HttpMethod::Get,
            absolute: params.absolute_url,
            url_parameters: params.url_parameters,
            body: None,
            asynchronous: params.asynchronous.unwrap_or(verb_defaults::READ_ASYNC),
            on_success: params.success,
            on_failure: params.error,
        })
        .await
    }

    /// Performs an HTTP POST updating an entry at the given path.
    ///
    /// Same contract as [`create`](Self::create): `data` must be a JSON
    /// object, default execution is synchronous.
    pub async fn update(&self, path: &str, data: Value, params: CallParams) -> RequestHandle {
        let body = if data.is_object() {
            Some(data)
        } else {
            tracing::error!("update expects an object payload");
            None
        };

        self.execute(RequestSpec {
            path: path.to_string(),
            method: HttpMethod::Post,
            absolute: params.absolute_url,
            url_parameters: Vec::new(),
            body,
            asynchronous: params.asynchronous.unwrap_or(verb_defaults::UPDATE_ASYNC),
            on_success: params.success,
            on_failure: params.error,
        })
        .await
    }

    /// Performs an HTTP DELETE for the entries named by
    /// `params.url_parameters`.
    ///
    /// Unlike [`read`](Self::read), the URL parameters are the call's data:
    /// they identify what to delete. Since DELETE carries no body here,
    /// they land in the URL as appended path segments. An empty
    /// `url_parameters` is logged at the fatal channel and the DELETE goes
    /// out against the bare path. Default execution is synchronous.
    pub async fn remove(&self, path: &str, params: CallParams) -> RequestHandle {
        let url_parameters = if params.url_parameters.is_empty() {
            tracing::error!("remove expects url_parameters naming the entries to delete");
            Vec::new()
        } else {
            params.url_parameters
        };

        self.execute(RequestSpec {
            path: path.to_string(),
            method: HttpMethod::Delete,
            absolute: params.absolute_url,
            url_parameters,
            body: None,
            asynchronous: params.asynchronous.unwrap_or(verb_defaults::REMOVE_ASYNC),
            on_success: params.success,
            on_failure: params.error,
        })
        .await
    }

    /// Performs an HTTP POST query against the given path.
    ///
    /// Same payload contract as [`create`](Self::create), but the default
    /// execution mode is asynchronous, matching its read-side role.
    pub async fn query(&self, path: &str, data: Value, params: CallParams) -> RequestHandle {
        let body = if data.is_object() {
            Some(data)
        } else {
            tracing::error!("query expects an object payload");
            None
        };

        self.execute(RequestSpec {
            path: path.to_string(),
            method: HttpMethod::Post,
            absolute: params.absolute_url,
            url_parameters: Vec::new(),
            body,
            asynchronous: params.asynchronous.unwrap_or(verb_defaults::QUERY_ASYNC),
            on_success: params.success,
            on_failure: params.error,
        })
        .await
    }

    /// Performs a request that doesn't fit the CRUD verbs.
    ///
    /// `params.method_override` drives the branching: with `Post`, the call
    /// requires `params.input` as its body and discards any
    /// `url_parameters`; with any other (or no) override the method passes
    /// through (defaulting to GET), `url_parameters` become the call's
    /// data, and `input` is discarded. Only POST attaches a body. Default
    /// execution is asynchronous.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// client
    ///     .run_action(
    ///         "/orders/1/approve",
    ///         CallParams::new()
    ///             .method_override(HttpMethod::Post)
    ///             .input(json!({"note": "ok"})),
    ///     )
    ///     .await;
    /// ```
    pub async fn run_action(&self, path: &str, params: CallParams) -> RequestHandle {
        let method = params.method.unwrap_or(HttpMethod::Get);
        let (body, url_parameters) = if method == HttpMethod::Post {
            if params.input.is_none() {
                tracing::error!("run_action with POST expects an input payload");
            }
            (params.input, Vec::new())
        } else {
            (None, params.url_parameters)
        };

        self.execute(RequestSpec {
            path: path.to_string(),
            method,
            absolute: params.absolute_url,
            url_parameters,
            body,
            asynchronous: params
                .asynchronous
                .unwrap_or(verb_defaults::RUN_ACTION_ASYNC),
            on_success: params.success,
            on_failure: params.error,
        })
        .await
    }

    /// Returns the refresh-after-navigate state.
    #[must_use]
    pub fn refresh_after_navigate(&self) -> bool {
        self.refresh_after_navigate.load(Ordering::Relaxed)
    }

    /// Sets the refresh-after-navigate state.
    pub fn set_refresh_after_navigate(&self, refresh: bool) {
        self.refresh_after_navigate.store(refresh, Ordering::Relaxed);
    }

    /// Returns a snapshot of the seeded data store.
    #[must_use]
    pub fn data(&self) -> Value {
        self.store
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Replaces the data store contents.
    pub fn set_data(&self, data: Value) {
        *self
            .store
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = data;
    }

    /// Builds the wire request from a spec and hands it to the execution
    /// strategy selected by the resolved mode flag.
    async fn execute(&self, spec: RequestSpec) -> RequestHandle {
        // POST carries its data in the body; URL parameters only ever
        // extend the path for the other methods.
        let segments: &[String] = if spec.method == HttpMethod::Post {
            &[]
        } else {
            &spec.url_parameters
        };
        let url = path::resolve(&self.base_url, &spec.path, spec.absolute, segments);

        let payload = match (spec.method, &spec.body) {
            (HttpMethod::Post, Some(body)) => {
                Some(serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string()))
            }
            _ => None,
        };

        let request = TransportRequest {
            url,
            method: spec.method,
            content_type: JSON_CONTENT_TYPE,
            payload,
        };

        let on_success = normalize_success(spec.on_success);
        let on_failure = normalize_failure(spec.on_failure);

        let executor: &dyn Executor = if spec.asynchronous {
            &NonBlockingExecutor
        } else {
            &BlockingExecutor
        };
        executor
            .run(Arc::clone(&self.transport), request, on_success, on_failure)
            .await
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("refresh_after_navigate", &self.refresh_after_navigate())
            .finish_non_exhaustive()
    }
}
