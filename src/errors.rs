//! Error types for the transport seam.
//!
//! The public verb API never returns errors: contract violations are
//! logged and transport failures are routed to failure callbacks (see the
//! crate-level error-handling notes). The only `Result`-bearing boundary is
//! the [`Transport`](crate::transport::Transport) trait, whose errors are
//! defined here.

use thiserror::Error;

/// Errors a [`Transport`](crate::transport::Transport) implementation can
/// report for a dispatch that produced no HTTP response.
///
/// A response that did arrive, whatever its status code, is not an error at this
/// level; the executors inspect the status and route non-2xx replies to the
/// failure callback themselves.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed mid-flight.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The resolved URL could not be parsed into a dispatchable form.
    #[error("Invalid request URL '{url}'.")]
    InvalidUrl {
        /// The URL that was rejected.
        url: String,
    },
}
