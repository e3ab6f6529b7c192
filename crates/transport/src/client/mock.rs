//! In-memory transport for testing.

use crate::error::{ErrorKind, Result};
use crate::{Request, Response, Transport};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Clone)]
enum Route {
    Respond(Response),
    NetworkFailure,
}

/// In-memory transport for testing.
///
/// Canned responses are keyed by the exact request URL. URLs without a route
/// answer `404 Not Found`, so a test only has to describe the happy paths it
/// cares about. Every request is recorded (behind a [`RwLock`], so all trait
/// methods operate on `&self`) which lets tests assert that a fallback path
/// was, or wasn't, taken.
///
/// # Examples
///
/// ```
/// use vitrina_transport::client::MockTransport;
/// use vitrina_transport::{Request, Transport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = MockTransport::default()
///     .with_body("https://example.com/data.json", r#"{"precio": 10}"#)
///     .with_network_failure("https://example.com/down");
///
/// let response = transport.get(&Request::new("https://example.com/data.json")).await?;
/// assert_eq!(response.status, 200);
/// assert!(transport.get(&Request::new("https://example.com/down")).await.is_err());
/// assert_eq!(transport.get(&Request::new("https://example.com/nope")).await?.status, 404);
/// assert_eq!(transport.request_count().await, 3);
/// # Ok(())
/// # }
/// ```
pub struct MockTransport {
    name: String,
    routes: HashMap<String, Route>,
    requests: RwLock<Vec<Request>>,
}

impl MockTransport {
    /// Change the name of the mock transport.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Answer `url` with the given response.
    pub fn with_response(mut self, url: impl Into<String>, response: Response) -> Self {
        self.routes.insert(url.into(), Route::Respond(response));
        self
    }

    /// Answer `url` with `200 OK` and the given body.
    pub fn with_body(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.with_response(url, Response::new(200, body))
    }

    /// Answer `url` with `200 OK`, the given body and `Content-Type`.
    pub fn with_typed_body(
        self,
        url: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        self.with_response(url, Response::new(200, body).with_content_type(content_type))
    }

    /// Answer `url` with an empty body and the given status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.with_response(url, Response::new(status, Vec::new()))
    }

    /// Requests to `url` never complete.
    pub fn with_network_failure(mut self, url: impl Into<String>) -> Self {
        self.routes.insert(url.into(), Route::NetworkFailure);
        self
    }

    /// Every request seen so far, in order.
    pub async fn requests(&self) -> Vec<Request> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// How many times `url` was requested.
    pub async fn hits(&self, url: &str) -> usize {
        self.requests.read().await.iter().filter(|request| request.url == url).count()
    }
}
impl Default for MockTransport {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            routes: HashMap::new(),
            requests: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, request: &Request) -> Result<Response> {
        self.requests.write().await.push(request.clone());
        match self.routes.get(&request.url) {
            Some(Route::Respond(response)) => Ok(response.clone()),
            Some(Route::NetworkFailure) => exn::bail!(ErrorKind::Network {
                url: request.url.clone(),
                reason: "simulated network failure".to_string(),
            }),
            None => Ok(Response::new(404, Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_body() {
        let transport = MockTransport::default().with_body("https://a/1", b"hello".to_vec());
        let response = transport.get(&Request::new("https://a/1")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"hello");
    }

    #[tokio::test]
    async fn test_unknown_url_is_not_found() {
        let transport = MockTransport::default();
        let response = transport.get(&Request::new("https://a/missing")).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_network_failure() {
        let transport = MockTransport::default().with_network_failure("https://a/down");
        let err = transport.get(&Request::new("https://a/down")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network { .. }));
    }

    #[tokio::test]
    async fn test_status_route() {
        let transport = MockTransport::default().with_status("https://a/forbidden", 403);
        let response = transport.get(&Request::new("https://a/forbidden")).await.unwrap();
        assert_eq!(response.status, 403);
        assert!(response.error_for_status("https://a/forbidden").is_err());
    }

    #[tokio::test]
    async fn test_typed_body() {
        let transport = MockTransport::default().with_typed_body("https://a/img", "image/png", vec![1, 2, 3]);
        let response = transport.get(&Request::new("https://a/img")).await.unwrap();
        assert_eq!(response.media_type(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_records_requests() {
        let transport = MockTransport::default().with_name("recorder");
        assert_eq!(transport.name(), "recorder");
        transport.get(&Request::new("https://a/1").accept("image/*")).await.unwrap();
        transport.get(&Request::new("https://a/2")).await.unwrap();
        transport.get(&Request::new("https://a/1")).await.unwrap();
        assert_eq!(transport.request_count().await, 3);
        assert_eq!(transport.hits("https://a/1").await, 2);
        assert_eq!(transport.hits("https://a/3").await, 0);
        let requests = transport.requests().await;
        assert_eq!(requests[0].accept, Some("image/*"));
        assert_eq!(requests[1].url, "https://a/2");
    }
}
