use crate::error::FailureCause;
use crate::fetcher::ResilientFetcher;
use crate::proxy::{Envelope, ProxyConfig};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use derive_more::Display;
use std::collections::HashMap;
use std::iter;
use tokio::sync::RwLock;
use tracing::instrument;
use vitrina_drive::urls::{export_view_url, thumbnail_cdn_url, thumbnail_url};
use vitrina_transport::Request;

/// Gray 300×200 "Imagen no disponible" SVG, returned when no source works.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMzAwIiBoZWlnaHQ9IjIwMCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMTAwJSIgaGVpZ2h0PSIxMDAlIiBmaWxsPSIjZGRkIi8+PHRleHQgeD0iNTAlIiB5PSI1MCUiIGZvbnQtc2l6ZT0iMTgiIHRleHQtYW5jaG9yPSJtaWRkbGUiIGR5PSIuM2VtIj5JbWFnZW4gbm8gZGlzcG9uaWJsZTwvdGV4dD48L3N2Zz4=";
const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";
const IMAGE_ACCEPT: &str = "image/*";

/// Encode `bytes` as a base64 `data:` URI.
pub fn data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Image URL templates, in the order they're tried for each proxy.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSource {
    #[display("thumbnail-cdn")]
    ThumbnailCdn,
    #[display("export-view")]
    ExportView,
    #[display("thumbnail")]
    Thumbnail,
}
impl ImageSource {
    pub const ALL: [Self; 3] = [Self::ThumbnailCdn, Self::ExportView, Self::Thumbnail];

    pub fn url(self, file_id: &str) -> String {
        match self {
            Self::ThumbnailCdn => thumbnail_cdn_url(file_id),
            Self::ExportView => export_view_url(file_id),
            Self::Thumbnail => thumbnail_url(file_id),
        }
    }
}

/// Resolved images keyed by file id.
///
/// Scoped to a single catalog build: a fresh build starts cold. Only real
/// images are stored, never [`PLACEHOLDER_IMAGE`].
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: RwLock<HashMap<String, String>>,
}
impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, file_id: &str) -> Option<String> {
        self.entries.read().await.get(file_id).cloned()
    }

    pub async fn insert(&self, file_id: impl Into<String>, data_uri: String) {
        self.entries.write().await.insert(file_id.into(), data_uri);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl ResilientFetcher {
    /// Resolves an image to a `data:` URI.
    ///
    /// Every image proxy is tried with each [`ImageSource`] before falling
    /// back to requesting the sources directly. The first successful
    /// response wins and is cached under `file_id`. This never fails: when
    /// nothing works the result is [`PLACEHOLDER_IMAGE`].
    #[instrument(skip(self, cache))]
    pub async fn fetch_image(&self, cache: &ImageCache, file_id: &str) -> String {
        if let Some(hit) = cache.get(file_id).await {
            tracing::trace!("Image cache hit");
            return hit;
        }
        let routes = self.image_proxies.iter().map(Some).chain(iter::once(None));
        for proxy in routes {
            for source in ImageSource::ALL {
                match self.get_image(proxy, &source.url(file_id)).await {
                    Ok(data_uri) => {
                        tracing::debug!(%source, proxy = proxy.map(|p| p.endpoint.as_str()), "Image downloaded");
                        cache.insert(file_id, data_uri.clone()).await;
                        return data_uri;
                    },
                    Err(cause) => {
                        tracing::debug!(%source, proxy = proxy.map(|p| p.endpoint.as_str()), %cause, "Image source failed");
                    },
                }
            }
        }
        tracing::warn!("No image source worked, using placeholder");
        PLACEHOLDER_IMAGE.to_string()
    }

    async fn get_image(&self, proxy: Option<&ProxyConfig>, target: &str) -> Result<String, FailureCause> {
        let url = proxy.map_or_else(|| target.to_string(), |proxy| proxy.wrap(target));
        let response = self.get_ok(&self.primary, Request::new(url).accept(IMAGE_ACCEPT)).await?;
        // An enveloped body's Content-Type describes the envelope.
        let media_type = match proxy.map(|p| p.envelope) {
            Some(Envelope::JsonContents) => DEFAULT_MEDIA_TYPE.to_string(),
            _ => response.media_type().unwrap_or(DEFAULT_MEDIA_TYPE).to_string(),
        };
        let body = match proxy {
            Some(proxy) => proxy.unwrap(response.body)?,
            None => response.body,
        };
        // Some relays already hand back a data URI.
        let body = match String::from_utf8(body) {
            Ok(text) if text.starts_with("data:") => return Ok(text),
            Ok(text) => text.into_bytes(),
            Err(err) => err.into_bytes(),
        };
        Ok(data_uri(&media_type, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vitrina_transport::Response;
    use vitrina_transport::client::MockTransport;

    const ID: &str = "img1";

    fn fetcher(primary: MockTransport, proxies: Vec<ProxyConfig>) -> (ResilientFetcher, Arc<MockTransport>) {
        let primary = Arc::new(primary);
        let fetcher = ResilientFetcher::new(primary.clone(), Arc::new(MockTransport::default())).with_image_proxies(proxies);
        (fetcher, primary)
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("image/png", b"hello"), "data:image/png;base64,aGVsbG8=");
        assert!(PLACEHOLDER_IMAGE.starts_with("data:image/svg+xml;base64,"));
    }

    #[tokio::test]
    async fn test_direct_source_used_when_no_proxies() {
        let primary = MockTransport::default().with_typed_body(thumbnail_cdn_url(ID), "image/jpeg; charset=binary", b"jpg".to_vec());
        let (fetcher, transport) = fetcher(primary, Vec::new());
        let cache = ImageCache::new();
        assert_eq!(fetcher.fetch_image(&cache, ID).await, data_uri("image/jpeg", b"jpg"));
        assert_eq!(transport.requests().await[0].accept, Some(IMAGE_ACCEPT));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let (fetcher, transport) = fetcher(MockTransport::default(), Vec::new());
        let cache = ImageCache::new();
        cache.insert(ID, "data:image/png;base64,AAAA".to_string()).await;
        assert_eq!(fetcher.fetch_image(&cache, ID).await, "data:image/png;base64,AAAA");
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_proxies_before_direct() {
        let proxy = ProxyConfig::raw("https://relay.test/?");
        // Only the second template works through the proxy; direct would also work.
        let primary = MockTransport::default()
            .with_body(proxy.wrap(&export_view_url(ID)), b"via-proxy".to_vec())
            .with_body(thumbnail_cdn_url(ID), b"direct".to_vec());
        let (fetcher, transport) = fetcher(primary, vec![proxy.clone()]);
        let uri = fetcher.fetch_image(&ImageCache::new(), ID).await;
        assert_eq!(uri, data_uri(DEFAULT_MEDIA_TYPE, b"via-proxy"));
        let urls: Vec<_> = transport.requests().await.into_iter().map(|r| r.url).collect();
        assert_eq!(urls, [proxy.wrap(&thumbnail_cdn_url(ID)), proxy.wrap(&export_view_url(ID))]);
    }

    #[tokio::test]
    async fn test_enveloped_image_ignores_envelope_content_type() {
        let proxy = ProxyConfig::json_contents("https://relay.test/get?url=");
        let primary = MockTransport::default().with_response(
            proxy.wrap(&thumbnail_cdn_url(ID)),
            Response::new(200, br#"{"contents": "svg-bytes"}"#.to_vec()).with_content_type("application/json"),
        );
        let (fetcher, _) = fetcher(primary, vec![proxy]);
        assert_eq!(fetcher.fetch_image(&ImageCache::new(), ID).await, data_uri(DEFAULT_MEDIA_TYPE, b"svg-bytes"));
    }

    #[tokio::test]
    async fn test_enveloped_data_uri_kept_verbatim() {
        let proxy = ProxyConfig::json_contents("https://relay.test/get?url=");
        let primary = MockTransport::default().with_typed_body(
            proxy.wrap(&thumbnail_cdn_url(ID)),
            "application/json",
            br#"{"contents": "data:image/png;base64,iVBORw0KGgo=", "status": {"http_code": 200}}"#.to_vec(),
        );
        let (fetcher, _) = fetcher(primary, vec![proxy]);
        let cache = ImageCache::new();
        assert_eq!(fetcher.fetch_image(&cache, ID).await, "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(cache.get(ID).await.as_deref(), Some("data:image/png;base64,iVBORw0KGgo="));
    }

    #[tokio::test]
    async fn test_placeholder_when_everything_fails() {
        let proxies = vec![ProxyConfig::raw("https://a.test/?"), ProxyConfig::raw("https://b.test/?")];
        let primary = MockTransport::default().with_network_failure(thumbnail_cdn_url(ID));
        let (fetcher, transport) = fetcher(primary, proxies);
        let cache = ImageCache::new();
        assert_eq!(fetcher.fetch_image(&cache, ID).await, PLACEHOLDER_IMAGE);
        // (2 proxies + direct) × 3 templates.
        assert_eq!(transport.request_count().await, 9);
        assert!(cache.is_empty().await);
    }
}
