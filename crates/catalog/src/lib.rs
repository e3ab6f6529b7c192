//! Product catalogs out of Drive folders.
//!
//! Each subfolder of the root folder is one product: a `data.json`
//! descriptor plus any number of images. [`CatalogBuilder`] walks the
//! subfolders in listing order, downloads each descriptor through the
//! [`ResilientFetcher`](vitrina_fetch::ResilientFetcher) fallback chain and
//! turns it into a [`ProductRecord`]. A product that can't be built is
//! skipped, never fatal.

mod builder;
pub mod error;
mod images;
mod product;
mod stream;

pub use crate::builder::CatalogBuilder;
pub use crate::images::{ImageMode, ResolvedImage, resolve_images};
pub use crate::product::{ProductRecord, parse_price};
pub use crate::stream::{CatalogEvent, SkipReason};
