//! Public Drive URLs that don't need an API key.

/// Base URL of the Drive v3 REST API.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";
/// Longest edge, in pixels, requested from the thumbnail endpoints.
const THUMBNAIL_SIZE: u32 = 500;

/// Download link for the original file.
pub fn direct_download_url(id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={id}")
}

/// "View" link, served inline rather than as an attachment.
pub fn export_view_url(id: &str) -> String {
    format!("https://drive.google.com/uc?export=view&id={id}")
}

/// Resized image straight from the Google user-content CDN.
pub fn thumbnail_cdn_url(id: &str) -> String {
    format!("https://lh3.googleusercontent.com/d/{id}=s{THUMBNAIL_SIZE}")
}

/// Drive's own thumbnail endpoint.
pub fn thumbnail_url(id: &str) -> String {
    format!("https://drive.google.com/thumbnail?id={id}&sz=w{THUMBNAIL_SIZE}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_id;

    #[test]
    fn test_urls() {
        assert_eq!(direct_download_url("abc"), "https://drive.google.com/uc?export=download&id=abc");
        assert_eq!(export_view_url("abc"), "https://drive.google.com/uc?export=view&id=abc");
        assert_eq!(thumbnail_cdn_url("abc"), "https://lh3.googleusercontent.com/d/abc=s500");
        assert_eq!(thumbnail_url("abc"), "https://drive.google.com/thumbnail?id=abc&sz=w500");
    }

    #[test]
    fn test_urls_round_trip_through_id_extraction() {
        for url in [direct_download_url("a-1"), export_view_url("a-1"), thumbnail_cdn_url("a-1"), thumbnail_url("a-1")] {
            assert_eq!(extract_id(&url), "a-1", "{url}");
        }
    }
}
