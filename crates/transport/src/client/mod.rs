//! Transport trait and implementations.
//!
//! This module defines the `Transport` trait, which provides a unified
//! interface for fetching remote resources across different HTTP client
//! set-ups (the pooled primary client, the independent alternate client, and
//! an in-memory mock for tests).

mod http;
#[cfg(feature = "mock")]
mod mock;

pub use self::http::{Flavor, HttpTransport, TransportOptions};
#[cfg(feature = "mock")]
pub use self::mock::MockTransport;
use crate::error::Result;
use crate::models::{Request, Response};
use async_trait::async_trait;

/// Unified interface for HTTP transports.
///
/// A transport performs exactly one `GET` per call: no retries, no redirects
/// beyond what the underlying client does on its own, no status
/// interpretation. Fallback policy lives in the callers.
///
/// # Errors
/// - A completed exchange is **always** `Ok`, even for `404` or `500`. Use
///   [`Response::error_for_status`] to turn it into
///   [`Status`](crate::error::ErrorKind::Status).
/// - A request that never completed is
///   [`Network`](crate::error::ErrorKind::Network).
///
/// # Examples
///
/// ```no_run
/// use vitrina_transport::{Request, Transport, error::Result};
///
/// async fn body_len(transport: &dyn Transport, url: &str) -> Result<usize> {
///     let response = transport.get(&Request::new(url)).await?.error_for_status(url)?;
///     Ok(response.body.len())
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name of the transport, used for logging only.
    fn name(&self) -> &str;

    /// Perform a `GET` request and buffer the whole body.
    async fn get(&self, request: &Request) -> Result<Response>;
}
