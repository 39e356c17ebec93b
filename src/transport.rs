//! The HTTP transport capability consumed by the request layer.
//!
//! [`Transport`] is the single external dependency of the crate: issue a
//! request, report completion or failure. The production implementation is
//! [`HttpTransport`] over `reqwest`; tests inject their own implementations
//! through [`RestClient::with_transport`](crate::client::RestClient::with_transport).

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::request::HttpMethod;

/// Content type attached to every dispatched request.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// A fully-resolved wire request, ready to dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
    /// Final URL (base URL already applied unless the call was absolute).
    pub url: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Content type header value, always [`JSON_CONTENT_TYPE`].
    pub content_type: &'static str,
    /// Serialized JSON body; only present for POST requests.
    pub payload: Option<String>,
}

/// The transport's report of a completed HTTP exchange.
///
/// Any response that arrived is a reply; status classification is the
/// executor's job, not the transport's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body text.
    pub body: String,
}

/// HTTP transport capability: issue one request, report the exchange.
///
/// # Errors
///
/// Implementations return [`TransportError`] only when no HTTP response was
/// produced (network failure, unusable URL).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Dispatches one request and returns the raw exchange result.
    async fn dispatch(&self, request: &TransportRequest) -> Result<TransportReply, TransportError>;
}

/// Production [`Transport`] over [`reqwest::Client`].
///
/// # Thread Safety
///
/// `HttpTransport` is `Send + Sync` and is shared behind an `Arc` by the
/// client.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

// Verify HttpTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpTransport>();
};

impl HttpTransport {
    /// Creates a transport with its own connection pool.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(&self, request: &TransportRequest) -> Result<TransportReply, TransportError> {
        let url = reqwest::Url::parse(&request.url).map_err(|_| TransportError::InvalidUrl {
            url: request.url.clone(),
        })?;

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        builder = builder.header(reqwest::header::CONTENT_TYPE, request.content_type);
        if let Some(payload) = &request.payload {
            builder = builder.body(payload.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(TransportReply { status, body })
    }
}
