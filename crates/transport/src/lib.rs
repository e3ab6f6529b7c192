pub mod client;
pub mod error;
mod models;

pub use crate::client::Transport;
pub use crate::models::{Request, Response};
use std::sync::Arc;

pub type TransportHandle = Arc<dyn Transport + Send + Sync>;
