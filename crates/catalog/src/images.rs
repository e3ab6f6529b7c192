use derive_more::Display;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::{Deserialize, Serialize};
use vitrina_drive::extract_id;
use vitrina_fetch::{ImageCache, ResilientFetcher};

/// What ends up in [`ProductRecord::imagenes`](crate::ProductRecord::imagenes).
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Direct-download links; no image is fetched while building.
    #[display("link")]
    Link,
    /// Self-contained `data:` URIs resolved through the fetcher.
    #[default]
    #[display("embed")]
    Embed,
}

/// An image resolved by [`resolve_images`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImage {
    /// Position in the input.
    pub index: usize,
    pub image_id: String,
    pub data_uri: String,
}

/// Resolves Drive image links (or bare ids) to `data:` URIs, all at once.
///
/// Inputs that don't look like Drive links are used verbatim as ids. Results
/// come back in input order even though the requests complete in any order.
/// Images that can't be fetched resolve to the placeholder.
pub async fn resolve_images<I>(fetcher: &ResilientFetcher, cache: &ImageCache, urls: I) -> Vec<ResolvedImage>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut pending: FuturesUnordered<_> = urls
        .into_iter()
        .enumerate()
        .map(|(index, url)| {
            let image_id = extract_id(url.as_ref()).to_string();
            async move {
                let data_uri = fetcher.fetch_image(cache, &image_id).await;
                ResolvedImage { index, image_id, data_uri }
            }
        })
        .collect();
    let mut resolved = Vec::with_capacity(pending.len());
    while let Some(image) = pending.next().await {
        resolved.push(image);
    }
    resolved.sort_unstable_by_key(|image| image.index);
    resolved
}
