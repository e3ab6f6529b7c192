use crate::error::Result;
use crate::images::{ImageMode, resolve_images};
use crate::product::ProductRecord;
use crate::stream::{CatalogEvent, SkipReason};
use futures::StreamExt;
use std::pin::pin;
use tracing::instrument;
use vitrina_drive::urls::direct_download_url;
use vitrina_drive::{DriveLister, FileEntry};
use vitrina_fetch::{ImageCache, ResilientFetcher};

/// Builds a product catalog from a Drive folder whose subfolders each hold a
/// `data.json` descriptor and the product's images.
///
/// ```text
/// Catálogo/               <- root
/// ├── Silla/
/// │   ├── data.json       <- {"titulo": "Silla", "precio": 1500, ...}
/// │   ├── frente.jpg
/// │   └── lado.jpg
/// └── Mesa/
///     └── ...
/// ```
#[derive(Clone)]
pub struct CatalogBuilder {
    lister: DriveLister,
    fetcher: ResilientFetcher,
    image_mode: ImageMode,
}

impl CatalogBuilder {
    pub fn new(lister: DriveLister, fetcher: ResilientFetcher) -> Self {
        Self { lister, fetcher, image_mode: ImageMode::default() }
    }

    pub fn with_image_mode(mut self, image_mode: ImageMode) -> Self {
        self.image_mode = image_mode;
        self
    }

    pub fn image_mode(&self) -> ImageMode {
        self.image_mode
    }

    pub fn lister(&self) -> &DriveLister {
        &self.lister
    }

    pub fn fetcher(&self) -> &ResilientFetcher {
        &self.fetcher
    }

    /// Builds the whole catalog, in subfolder listing order.
    ///
    /// Skipped subfolders are simply absent; use [`stream`](Self::stream) to
    /// find out which ones were skipped and why.
    pub async fn build(&self, root_url: &str) -> Result<Vec<ProductRecord>> {
        let mut events = pin!(self.stream(root_url));
        let mut records = Vec::new();
        while let Some(event) = events.next().await {
            if let CatalogEvent::Built(record) = event? {
                records.push(record);
            }
        }
        Ok(records)
    }

    #[instrument(skip_all, fields(folder_id = %folder.id, folder_name = %folder.name))]
    pub(crate) async fn build_product(
        &self,
        folder: &FileEntry,
        cache: &ImageCache,
    ) -> std::result::Result<ProductRecord, SkipReason> {
        let children = match self.lister.list_children(&folder.id).await {
            Ok(children) => children,
            Err(err) => {
                tracing::warn!(error = ?err, "Could not list product folder");
                return Err(SkipReason::Listing((*err).clone()));
            },
        };
        let descriptor_file = DriveLister::find_descriptor(&children).ok_or(SkipReason::NoDescriptor)?;
        if descriptor_file.web_content_link.is_none() {
            return Err(SkipReason::NoContentLink);
        }
        let descriptor = self
            .fetcher
            .fetch_descriptor(descriptor_file)
            .await
            .map_err(|err| SkipReason::Descriptor((*err).clone()))?;

        let images = DriveLister::images(&children);
        let imagenes = match self.image_mode {
            ImageMode::Link => images.iter().map(|image| direct_download_url(&image.id)).collect(),
            ImageMode::Embed => resolve_images(&self.fetcher, cache, images.iter().map(|image| &image.id))
                .await
                .into_iter()
                .map(|resolved| resolved.data_uri)
                .collect(),
        };
        Ok(ProductRecord::from_descriptor(&descriptor, imagenes))
    }
}
