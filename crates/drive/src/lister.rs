use crate::error::{ErrorKind, Result};
use crate::models::{FileEntry, Listing};
use exn::ResultExt;
use tracing::instrument;
use vitrina_transport::{Request, TransportHandle};

/// Field selector sent with every listing request.
const LISTING_FIELDS: &str = "nextPageToken,files(id,name,mimeType,webContentLink,webViewLink)";
/// Largest page the listing endpoint serves.
const PAGE_SIZE: u32 = 1000;

/// Lists the children of Drive folders through the v3 REST API.
///
/// Authenticates with a plain API key passed as a query parameter, which
/// only works for publicly shared folders. The key is never logged.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vitrina_drive::{DriveLister, urls::DEFAULT_API_BASE};
/// use vitrina_transport::client::{HttpTransport, TransportOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Arc::new(HttpTransport::primary(&TransportOptions::default())?);
/// let lister = DriveLister::new(transport, DEFAULT_API_BASE, "my-api-key");
/// for folder in lister.list_subfolders("1W8JRJdGEftF6E-RtJ1YlwcDOBQtZP1_W").await? {
///     println!("{} ({})", folder.name, folder.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DriveLister {
    transport: TransportHandle,
    api_base: String,
    api_key: String,
}

impl DriveLister {
    pub fn new(transport: TransportHandle, api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    /// URL of the listing request for `folder_id`.
    pub fn listing_url(&self, folder_id: &str) -> String {
        format!(
            "{}/files?q='{}'+in+parents&key={}&pageSize={PAGE_SIZE}&fields={}",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(folder_id),
            urlencoding::encode(&self.api_key),
            LISTING_FIELDS,
        )
    }

    /// Lists every child (files and folders) of a folder.
    ///
    /// A response without a `files` key is an empty folder, not an error.
    /// Only the first page (up to 1000 children) is read; a truncated
    /// listing is logged.
    ///
    /// # Errors
    /// - [`ErrorKind::Network`] if the request never completed,
    /// - [`ErrorKind::Transport`] on a non-success status,
    /// - [`ErrorKind::Parse`] if the body isn't a JSON listing.
    #[instrument(skip(self), fields(transport = self.transport.name()))]
    pub async fn list_children(&self, folder_id: &str) -> Result<Vec<FileEntry>> {
        let request = Request::new(self.listing_url(folder_id)).accept("application/json");
        let response = self.transport.get(&request).await.or_raise(|| ErrorKind::Network)?;
        if !response.is_success() {
            exn::bail!(ErrorKind::Transport(response.status));
        }
        let listing: Listing = serde_json::from_slice(&response.body).or_raise(|| ErrorKind::Parse)?;
        if listing.next_page_token.is_some() {
            tracing::warn!(children = listing.files.len(), "Folder has more children than one page, the rest are ignored");
        }
        tracing::debug!(children = listing.files.len(), "Listed folder");
        Ok(listing.files)
    }

    /// Lists only the subfolders of a folder, in listing order.
    pub async fn list_subfolders(&self, folder_id: &str) -> Result<Vec<FileEntry>> {
        Ok(self.list_children(folder_id).await?.into_iter().filter(FileEntry::is_folder).collect())
    }

    /// The descriptor file among `entries`. Duplicates aren't an error: the
    /// first one wins.
    pub fn find_descriptor(entries: &[FileEntry]) -> Option<&FileEntry> {
        entries.iter().find(|entry| entry.is_descriptor())
    }

    /// Image files among `entries`, in listing order.
    pub fn images(entries: &[FileEntry]) -> Vec<&FileEntry> {
        entries.iter().filter(|entry| entry.is_image()).collect()
    }
}
