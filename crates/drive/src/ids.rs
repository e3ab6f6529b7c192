//! Drive id extraction from human-supplied links.

use crate::consts::{BARE_ID_REGEX, FILE_LINK_REGEX, FOLDER_LINK_REGEX, ID_PARAM_REGEX};
use crate::error::{ErrorKind, Result};

/// Extracts the folder id from a folder sharing link (`.../folders/<id>`).
///
/// Returns `None` for anything that isn't a folder link; see [`extract_id`]
/// for the lenient version.
///
/// # Examples
///
/// ```
/// use vitrina_drive::extract_folder_id;
///
/// let url = "https://drive.google.com/drive/folders/1W8JRJdGEftF6E-RtJ1YlwcDOBQtZP1_W?usp=sharing";
/// assert_eq!(extract_folder_id(url), Some("1W8JRJdGEftF6E-RtJ1YlwcDOBQtZP1_W"));
/// assert_eq!(extract_folder_id("https://drive.google.com/file/d/abc/view"), None);
/// ```
pub fn extract_folder_id(url: &str) -> Option<&str> {
    FOLDER_LINK_REGEX.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Extracts a Drive id from a folder link, a file link (`/d/<id>`) or an
/// `id=<id>` query parameter, in that order.
///
/// When nothing matches, the input is assumed to already be an id and is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use vitrina_drive::extract_id;
///
/// assert_eq!(extract_id("https://drive.google.com/file/d/abc_123/view"), "abc_123");
/// assert_eq!(extract_id("https://drive.google.com/uc?export=download&id=xyz-9"), "xyz-9");
/// assert_eq!(extract_id("already-an-id"), "already-an-id");
/// ```
pub fn extract_id(input: &str) -> &str {
    [&*FOLDER_LINK_REGEX, &*FILE_LINK_REGEX, &*ID_PARAM_REGEX]
        .into_iter()
        .find_map(|regex| regex.captures(input).and_then(|c| c.get(1)))
        .map(|m| m.as_str())
        .unwrap_or(input)
}

/// `true` if the whole string looks like a Drive id.
pub fn is_bare_id(input: &str) -> bool {
    BARE_ID_REGEX.is_match(input)
}

/// Resolves the root folder of a catalog.
///
/// Same rules as [`extract_id`], except that the verbatim fallback must look
/// like a bare id: a link we can't make sense of is a hard error rather than
/// a confusing empty listing.
pub fn root_folder_id(input: &str) -> Result<String> {
    let input = input.trim();
    let id = extract_id(input);
    if !is_bare_id(id) {
        exn::bail!(ErrorKind::InvalidUrl(input.to_string()));
    }
    Ok(id.to_string())
}
