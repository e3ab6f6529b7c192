//! Drive listing models.

use serde::{Deserialize, Serialize};

/// MIME type Drive reports for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
/// File name of the per-product descriptor, matched case-insensitively.
pub const DESCRIPTOR_NAME: &str = "data.json";

/// One child of a Drive folder, as returned by the listing endpoint.
///
/// Only the fields requested through the `fields=` selector are present;
/// everything else Drive knows about the file is dropped on the floor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    /// Direct download link; absent for folders and for files whose owner
    /// disabled downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_content_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
}
impl FileEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            web_content_link: None,
            web_view_link: None,
        }
    }

    pub fn with_content_link(mut self, link: impl Into<String>) -> Self {
        self.web_content_link = Some(link.into());
        self
    }

    pub fn with_view_link(mut self, link: impl Into<String>) -> Self {
        self.web_view_link = Some(link.into());
        self
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// `true` for the product descriptor file (`data.json`, any case).
    pub fn is_descriptor(&self) -> bool {
        self.name.eq_ignore_ascii_case(DESCRIPTOR_NAME)
    }
}

/// Body of the listing endpoint. A missing `files` key means "no children".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Listing {
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Present when more children exist than fit in one page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}
