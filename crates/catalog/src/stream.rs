use crate::builder::CatalogBuilder;
use crate::error::{ErrorKind, Result};
use crate::product::ProductRecord;
use async_stream::stream;
use derive_more::Display;
use exn::ResultExt;
use futures::Stream;
use vitrina_drive::FileEntry;
use vitrina_drive::error::ErrorKind as DriveErrorKind;
use vitrina_drive::root_folder_id;
use vitrina_fetch::ImageCache;
use vitrina_fetch::error::ErrorKind as FetchErrorKind;

/// Progress events emitted by [`CatalogBuilder::stream`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete), exactly once, with the
///    number of product subfolders.
/// 3. One [`Built`](Self::Built) or [`Skipped`](Self::Skipped) per subfolder,
///    in listing order.
/// 4. [`Complete`](Self::Complete), exactly once, signalling the stream is
///    finished.
///
/// An error may terminate the stream early, in which case [`Complete`](Self::Complete)
/// is never emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    Started,
    /// The root folder has been listed; the subfolder count is now known.
    DiscoveryComplete(u64),
    Built(ProductRecord),
    /// A subfolder produced no product. The catalog goes on without it.
    Skipped { folder: FileEntry, reason: SkipReason },
    Complete,
}

/// Why a subfolder didn't make it into the catalog.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[display("could not list the folder: {_0}")]
    Listing(DriveErrorKind),
    #[display("no data.json in the folder")]
    NoDescriptor,
    #[display("data.json has no download link")]
    NoContentLink,
    #[display("{_0}")]
    Descriptor(FetchErrorKind),
}

impl CatalogBuilder {
    /// Streams [`CatalogEvent`]s for every product subfolder under `root_url`.
    ///
    /// `root_url` may be a folder link or a bare folder id. Subfolders are
    /// handled one after another; a single image cache is shared by the whole
    /// build. Only an unusable root link or an unlistable root folder end the
    /// stream with an error.
    pub fn stream<'a>(&'a self, root_url: &'a str) -> impl Stream<Item = Result<CatalogEvent>> + 'a {
        // `rustfmt` does not format macros that use braces. Wrap in parentheses!
        stream!({
            yield Ok(CatalogEvent::Started);

            let root = match root_folder_id(root_url).or_raise(|| ErrorKind::InvalidRootUrl) {
                Ok(id) => id,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            let folders = match self.lister().list_subfolders(&root).await.or_raise(|| ErrorKind::Listing) {
                Ok(folders) => folders,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
            yield Ok(CatalogEvent::DiscoveryComplete(u64::try_from(folders.len()).unwrap_or(0)));

            let cache = ImageCache::new();
            for folder in folders {
                match self.build_product(&folder, &cache).await {
                    Ok(record) => {
                        tracing::info!(folder = %folder.name, titulo = %record.titulo, "Product built");
                        yield Ok(CatalogEvent::Built(record));
                    },
                    Err(reason) => {
                        tracing::info!(folder = %folder.name, %reason, "Product skipped");
                        yield Ok(CatalogEvent::Skipped { folder, reason });
                    },
                }
            }

            yield Ok(CatalogEvent::Complete);
        })
    }
}
