//! Request parameter and specification types.
//!
//! This module provides [`CallParams`], the per-call parameter set accepted
//! by every verb method, along with [`HttpMethod`] and the callback type
//! aliases. The crate-internal [`RequestSpec`] is the fully-resolved,
//! immutable description of one HTTP call that the verbs hand to the
//! executor; caller-supplied parameters are consumed by value and never
//! written back.

use std::fmt;

use serde_json::Value;

/// Success callback: receives the parsed response data, the HTTP status
/// code, and the raw response text.
pub type SuccessHandler = Box<dyn FnOnce(&Value, u16, &str) + Send + 'static>;

/// Failure callback: receives an error description, the HTTP status code
/// (0 when no response was received), and the raw error text.
pub type FailureHandler = Box<dyn FnOnce(&str, u16, &str) + Send + 'static>;

/// HTTP methods supported by the request layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating and querying resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the wire name of this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-verb execution-mode defaults, applied when the caller leaves
/// [`CallParams::asynchronous`] unset.
///
/// | Verb | Default |
/// |---|---|
/// | create | synchronous |
/// | read | asynchronous |
/// | update | synchronous |
/// | remove | synchronous |
/// | query | asynchronous |
/// | `run_action` | asynchronous |
pub(crate) mod verb_defaults {
    pub(crate) const CREATE_ASYNC: bool = false;
    pub(crate) const READ_ASYNC: bool = true;
    pub(crate) const UPDATE_ASYNC: bool = false;
    pub(crate) const REMOVE_ASYNC: bool = false;
    pub(crate) const QUERY_ASYNC: bool = true;
    pub(crate) const RUN_ACTION_ASYNC: bool = true;
}

/// Optional parameters accepted by every verb method of
/// [`RestClient`](crate::client::RestClient).
///
/// Each verb recognizes a subset of these fields; unrecognized fields are
/// ignored. The struct is consumed by the verb call, so a fresh value is
/// built per request with the fluent setters.
///
/// # Example
///
/// ```rust
/// use deferred_rest::{CallParams, HttpMethod};
///
/// let params = CallParams::new()
///     .url_parameters(["42", "items"])
///     .asynchronous(true)
///     .success(|data, status, _raw| {
///         println!("got {data} with status {status}");
///     });
/// assert_eq!(params.method(), None);
/// let _ = params.method_override(HttpMethod::Post);
/// ```
#[derive(Default)]
pub struct CallParams {
    pub(crate) absolute_url: bool,
    pub(crate) url_parameters: Vec<String>,
    pub(crate) input: Option<Value>,
    pub(crate) success: Option<SuccessHandler>,
    pub(crate) error: Option<FailureHandler>,
    pub(crate) asynchronous: Option<bool>,
    pub(crate) method: Option<HttpMethod>,
}

impl CallParams {
    /// Creates an empty parameter set: relative path, no URL parameters, no
    /// callbacks, verb-default execution mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Treats the call's path as absolute, bypassing the client's base URL.
    #[must_use]
    pub const fn absolute_url(mut self, absolute: bool) -> Self {
        self.absolute_url = absolute;
        self
    }

    /// URL parameters, appended to the path as additional segments in the
    /// given order. Only meaningful for non-POST requests.
    #[must_use]
    pub fn url_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url_parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Input payload for [`run_action`](crate::client::RestClient::run_action)
    /// calls with a POST method override.
    #[must_use]
    pub fn input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Success callback, invoked with (parsed data, status, raw response).
    #[must_use]
    pub fn success<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(&Value, u16, &str) + Send + 'static,
    {
        self.success = Some(Box::new(handler));
        self
    }

    /// Failure callback, invoked with (error, status, raw error text).
    #[must_use]
    pub fn error<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(&str, u16, &str) + Send + 'static,
    {
        self.error = Some(Box::new(handler));
        self
    }

    /// Forces the execution mode instead of the verb's default.
    ///
    /// Unset means "use the verb's documented default"; the resolution
    /// happens exactly once, when the request specification is built.
    #[must_use]
    pub const fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = Some(asynchronous);
        self
    }

    /// Method override for
    /// [`run_action`](crate::client::RestClient::run_action); other verbs
    /// ignore it.
    #[must_use]
    pub const fn method_override(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Returns the method override, if one was set.
    #[must_use]
    pub const fn method(&self) -> Option<HttpMethod> {
        self.method
    }
}

impl fmt::Debug for CallParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallParams")
            .field("absolute_url", &self.absolute_url)
            .field("url_parameters", &self.url_parameters)
            .field("input", &self.input)
            .field("success", &self.success.is_some())
            .field("error", &self.error.is_some())
            .field("asynchronous", &self.asynchronous)
            .field("method", &self.method)
            .finish()
    }
}

/// Fully-resolved description of one HTTP call, built functionally from a
/// verb's inputs and discarded after dispatch. The tri-state execution-mode
/// parameter has already been collapsed against the per-verb default table
/// by the time a spec exists.
pub(crate) struct RequestSpec {
    pub(crate) path: String,
    pub(crate) method: HttpMethod,
    pub(crate) absolute: bool,
    pub(crate) url_parameters: Vec<String>,
    pub(crate) body: Option<Value>,
    pub(crate) asynchronous: bool,
    pub(crate) on_success: Option<SuccessHandler>,
    pub(crate) on_failure: Option<FailureHandler>,
}
