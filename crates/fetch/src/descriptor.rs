use crate::error::{ErrorKind, FailureCause, StrategyFailure, StrategyFailures};
use crate::fetcher::ResilientFetcher;
use crate::proxy::ProxyConfig;
use derive_more::Display;
use tracing::instrument;
use vitrina_drive::FileEntry;
use vitrina_drive::urls::direct_download_url;
use vitrina_transport::{Request, TransportHandle};

const JSON_ACCEPT: &str = "application/json, text/plain, */*";

/// A parsed product descriptor. Interpreting its fields is left to the caller.
pub type Descriptor = serde_json::Value;

/// The ways of downloading a descriptor, in the order they are attempted.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorStrategy {
    /// `GET` the file's `webContentLink` with the primary transport.
    #[display("content-link")]
    ContentLink,
    /// `GET` the direct download URL built from the file id, then each
    /// descriptor proxy in turn.
    #[display("download-by-id")]
    DownloadById,
    /// `GET` the `webContentLink` again, this time with the alternate transport.
    #[display("alternate-client")]
    AlternateClient,
}
impl DescriptorStrategy {
    pub const ALL: [Self; 3] = [Self::ContentLink, Self::DownloadById, Self::AlternateClient];
}

impl ResilientFetcher {
    /// Downloads and parses a descriptor file, trying every
    /// [`DescriptorStrategy`] until one yields valid JSON.
    ///
    /// A body that isn't JSON counts as a failure of the strategy that
    /// produced it, so a proxy's HTML error page doesn't end the search.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::AllStrategiesFailed`] with one record per strategy, in
    /// attempt order. For [`DescriptorStrategy::DownloadById`] the record
    /// holds the last failure seen (the last proxy, or the direct request if
    /// no proxies are configured).
    #[instrument(skip_all, fields(file_id = %entry.id, file_name = %entry.name))]
    pub async fn fetch_descriptor(&self, entry: &FileEntry) -> crate::error::Result<Descriptor> {
        let mut failures = Vec::with_capacity(DescriptorStrategy::ALL.len());
        for strategy in DescriptorStrategy::ALL {
            match self.attempt(strategy, entry).await {
                Ok(descriptor) => {
                    tracing::debug!(%strategy, "Descriptor downloaded");
                    return Ok(descriptor);
                },
                Err(cause) => {
                    tracing::warn!(%strategy, %cause, "Descriptor strategy failed");
                    failures.push(StrategyFailure { strategy, cause });
                },
            }
        }
        exn::bail!(ErrorKind::AllStrategiesFailed(StrategyFailures(failures)))
    }

    async fn attempt(&self, strategy: DescriptorStrategy, entry: &FileEntry) -> Result<Descriptor, FailureCause> {
        match strategy {
            DescriptorStrategy::ContentLink => self.get_json(&self.primary, content_link(entry)?).await,
            DescriptorStrategy::DownloadById => self.download_by_id(&entry.id).await,
            DescriptorStrategy::AlternateClient => self.get_json(&self.alternate, content_link(entry)?).await,
        }
    }

    async fn download_by_id(&self, file_id: &str) -> Result<Descriptor, FailureCause> {
        let url = direct_download_url(file_id);
        let mut last = match self.get_json(&self.primary, &url).await {
            Ok(descriptor) => return Ok(descriptor),
            Err(cause) => {
                tracing::warn!(%cause, "Direct download failed");
                cause
            },
        };
        for proxy in &self.descriptor_proxies {
            match self.get_json_via(proxy, &url).await {
                Ok(descriptor) => {
                    tracing::debug!(proxy = %proxy.endpoint, "Downloaded through proxy");
                    return Ok(descriptor);
                },
                Err(cause) => {
                    tracing::warn!(proxy = %proxy.endpoint, %cause, "Proxy download failed");
                    last = cause;
                },
            }
        }
        Err(last)
    }

    async fn get_json(&self, transport: &TransportHandle, url: &str) -> Result<Descriptor, FailureCause> {
        let response = self.get_ok(transport, Request::new(url).accept(JSON_ACCEPT)).await?;
        parse(&response.body)
    }

    async fn get_json_via(&self, proxy: &ProxyConfig, target: &str) -> Result<Descriptor, FailureCause> {
        let request = Request::new(proxy.wrap(target)).accept(JSON_ACCEPT);
        let response = self.get_ok(&self.primary, request).await?;
        parse(&proxy.unwrap(response.body)?)
    }
}

fn content_link(entry: &FileEntry) -> Result<&str, FailureCause> {
    entry.web_content_link.as_deref().ok_or(FailureCause::MissingLink)
}

fn parse(body: &[u8]) -> Result<Descriptor, FailureCause> {
    serde_json::from_slice(body).map_err(|e| FailureCause::Parse(e.to_string()))
}
