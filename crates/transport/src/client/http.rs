//! reqwest-backed HTTP transport.
//!
//! Two flavours exist because public Drive endpoints and CORS proxies behave
//! differently depending on how they're asked. The primary flavour is a plain
//! pooled client; the alternate flavour is a completely independent client
//! (own connection pool, HTTP/1.1 only, no idle connection reuse, explicit
//! `Accept` header) so that a wedged connection or protocol negotiation on
//! the primary client doesn't take the fallback path down with it.

use crate::error::{ErrorKind, Result};
use crate::{Request, Response, Transport};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Generous default, proxies can be slow to warm up.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Sent by the alternate flavour when the request doesn't specify one.
const ALTERNATE_ACCEPT: &str = "application/json, text/plain, */*";

/// Which client set-up a [`HttpTransport`] uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flavor {
    /// Pooled client with default protocol negotiation.
    #[default]
    Primary,
    /// Independent client: HTTP/1.1 only, fresh connection per request,
    /// explicit `Accept` header.
    Alternate,
}

/// Settings shared by every flavour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportOptions {
    /// Upper bound for a whole exchange, body included.
    pub timeout: Duration,
    pub user_agent: Option<String>,
}
impl Default for TransportOptions {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT, user_agent: None }
    }
}

/// HTTP transport backed by [`reqwest`].
///
/// # Examples
///
/// ```no_run
/// use vitrina_transport::client::{HttpTransport, TransportOptions};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = TransportOptions::default();
/// let primary = HttpTransport::primary(&options)?;
/// let alternate = HttpTransport::alternate(&options)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HttpTransport {
    name: String,
    flavor: Flavor,
    client: reqwest::Client,
}
impl HttpTransport {
    /// Create a new transport with the given flavour.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Setup`] if the underlying client can't be built
    /// (for example, a user agent that isn't a valid header value).
    pub fn new(name: impl Into<String>, flavor: Flavor, options: &TransportOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(options.timeout);
        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder = match flavor {
            Flavor::Primary => builder,
            Flavor::Alternate => builder.http1_only().pool_max_idle_per_host(0),
        };
        let name = name.into();
        let client = builder.build().or_raise(|| ErrorKind::Setup(format!("could not build client `{name}`")))?;
        Ok(Self { name, flavor, client })
    }

    pub fn primary(options: &TransportOptions) -> Result<Self> {
        Self::new("primary", Flavor::Primary, options)
    }

    pub fn alternate(options: &TransportOptions) -> Result<Self> {
        Self::new("alternate", Flavor::Alternate, options)
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Everything that goes wrong before we've got a status line (or while
    /// we're still reading the body) means the exchange never completed.
    fn network_error(url: &str, err: &reqwest::Error) -> ErrorKind {
        let reason = if err.is_timeout() {
            "timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        ErrorKind::Network { url: url.to_string(), reason }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, request: &Request) -> Result<Response> {
        let url = request.url.as_str();
        let accept = request.accept.or(match self.flavor {
            Flavor::Primary => None,
            Flavor::Alternate => Some(ALTERNATE_ACCEPT),
        });
        let mut builder = self.client.get(url);
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, accept);
        }
        tracing::trace!(transport = %self.name, url, "Sending request");
        let response = builder.send().await.map_err(|e| Self::network_error(url, &e))?;
        let status = response.status().as_u16();
        let content_type =
            response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()).map(str::to_string);
        let body = response.bytes().await.map_err(|e| Self::network_error(url, &e))?;
        tracing::trace!(transport = %self.name, url, status, bytes = body.len(), "Received response");
        Ok(Response { status, content_type, body: body.to_vec() })
    }
}
