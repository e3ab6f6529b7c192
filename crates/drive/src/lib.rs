//! Google Drive plumbing: link parsing, folder listing and URL building.
//!
//! Everything here talks to the public, API-key authenticated Drive v3
//! endpoints and the unauthenticated `drive.google.com` download links. No
//! OAuth, no write access, no pagination: a product folder is expected to
//! hold a handful of files.

mod consts;
pub mod error;
mod ids;
mod lister;
mod models;
pub mod urls;

pub use crate::ids::{extract_folder_id, extract_id, is_bare_id, root_folder_id};
pub use crate::lister::DriveLister;
pub use crate::models::{DESCRIPTOR_NAME, FOLDER_MIME_TYPE, FileEntry};
