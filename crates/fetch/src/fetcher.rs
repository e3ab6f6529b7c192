use crate::error::FailureCause;
use crate::proxy::{ProxyConfig, default_descriptor_proxies, default_image_proxies};
use vitrina_transport::{Request, Response, TransportHandle};

/// Downloads descriptors and images through an ordered fallback chain.
///
/// Two transports are involved: `primary` carries almost everything, while
/// `alternate` (typically an [`HttpTransport`] built with
/// [`Flavor::Alternate`]) only gets the final descriptor strategy. Both are
/// shared handles, so cloning a fetcher is cheap.
///
/// [`HttpTransport`]: vitrina_transport::client::HttpTransport
/// [`Flavor::Alternate`]: vitrina_transport::client::Flavor::Alternate
#[derive(Clone)]
pub struct ResilientFetcher {
    pub(crate) primary: TransportHandle,
    pub(crate) alternate: TransportHandle,
    pub(crate) descriptor_proxies: Vec<ProxyConfig>,
    pub(crate) image_proxies: Vec<ProxyConfig>,
}

impl ResilientFetcher {
    /// A fetcher using the built-in proxy lists.
    pub fn new(primary: TransportHandle, alternate: TransportHandle) -> Self {
        Self {
            primary,
            alternate,
            descriptor_proxies: default_descriptor_proxies(),
            image_proxies: default_image_proxies(),
        }
    }

    pub fn with_descriptor_proxies(mut self, proxies: Vec<ProxyConfig>) -> Self {
        self.descriptor_proxies = proxies;
        self
    }

    pub fn with_image_proxies(mut self, proxies: Vec<ProxyConfig>) -> Self {
        self.image_proxies = proxies;
        self
    }

    pub fn descriptor_proxies(&self) -> &[ProxyConfig] {
        &self.descriptor_proxies
    }

    pub fn image_proxies(&self) -> &[ProxyConfig] {
        &self.image_proxies
    }

    /// Performs `request` and insists on a success status.
    pub(crate) async fn get_ok(&self, transport: &TransportHandle, request: Request) -> Result<Response, FailureCause> {
        let response = transport.get(&request).await.map_err(|err| FailureCause::from(&*err))?;
        match response.is_success() {
            true => Ok(response),
            false => Err(FailureCause::Status(response.status)),
        }
    }
}
