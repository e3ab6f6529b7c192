//! Request and response models shared by every transport.

use crate::error::{ErrorKind, Result};

/// A single `GET` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    /// Value of the `Accept` header, if the caller cares.
    pub accept: Option<&'static str>,
}
impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), accept: None }
    }

    pub fn accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }
}

/// A completed HTTP exchange, whatever its status.
///
/// Transports return a `Response` for every exchange that actually completed;
/// turning a non-success status into an error is the caller's decision (see
/// [`error_for_status`](Self::error_for_status)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// `Content-Type` header, without any validation.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}
impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, content_type: None, body: body.into() }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// `true` for any `2xx` status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert a non-success response into [`ErrorKind::Status`].
    #[track_caller]
    pub fn error_for_status(self, url: impl Into<String>) -> Result<Self> {
        match self.is_success() {
            true => Ok(self),
            false => exn::bail!(ErrorKind::Status { url: url.into(), status: self.status }),
        }
    }

    /// The media type of the body with any parameters (`; charset=...`) stripped.
    pub fn media_type(&self) -> Option<&str> {
        self.content_type.as_deref().map(|ct| ct.split(';').next().unwrap_or(ct).trim()).filter(|ct| !ct.is_empty())
    }
}
