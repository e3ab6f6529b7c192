//! Resilient retrieval of Drive files.
//!
//! Public Drive download links reject some requests depending on sharing
//! settings and download-vs-view intent, and the CORS proxies used as a
//! workaround come and go. Instead of trusting any single path, every
//! retrieval walks an ordered list of strategies and stops at the first one
//! that works:
//!
//! - [`ResilientFetcher::fetch_descriptor`] tries three strategies (content
//!   link, download-by-id with proxy fallback, alternate client) and raises
//!   [`ErrorKind::AllStrategiesFailed`](crate::error::ErrorKind::AllStrategiesFailed)
//!   with one [`StrategyFailure`](crate::error::StrategyFailure) per strategy
//!   when nothing works.
//! - [`ResilientFetcher::fetch_image`] walks a proxy × URL-template grid,
//!   caches what it finds in an [`ImageCache`], and degrades to
//!   [`PLACEHOLDER_IMAGE`] instead of failing.

mod descriptor;
pub mod error;
mod fetcher;
mod image;
mod proxy;

pub use crate::descriptor::{Descriptor, DescriptorStrategy};
pub use crate::fetcher::ResilientFetcher;
pub use crate::image::{ImageCache, ImageSource, PLACEHOLDER_IMAGE, data_uri};
pub use crate::proxy::{Envelope, ProxyConfig, default_descriptor_proxies, default_image_proxies};
