//! Layered configuration for vitrina.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. A configuration file: either an explicit path, or the first of
//!    `config.{toml,yaml,yml,json}` found in the platform configuration
//!    directory (`$XDG_CONFIG_HOME/vitrina` on Linux).
//! 3. `VITRINA_*` environment variables, nested keys separated by `__`.
//! 4. Explicit overrides such as `--api-key`.
//!
//! ```toml
//! api_key = "AIza..."
//! root_folder = "https://drive.google.com/drive/folders/1W8JRJdGEftF6E-RtJ1YlwcDOBQtZP1_W"
//! image_mode = "link"
//!
//! [[descriptor_proxies]]
//! endpoint = "https://api.allorigins.win/get?url="
//! envelope = "json_contents"
//! ```

pub mod error;
mod loader;

pub use crate::loader::ConfigLoader;

use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vitrina_catalog::ImageMode;
use vitrina_drive::urls::DEFAULT_API_BASE;
use vitrina_fetch::{ProxyConfig, default_descriptor_proxies, default_image_proxies};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Google API key with the Drive API enabled. Required.
    pub api_key: String,
    pub api_base: String,
    /// Folder link or id used when none is given on the command line.
    pub root_folder: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    pub image_mode: ImageMode,
    pub descriptor_proxies: Vec<ProxyConfig>,
    pub image_proxies: Vec<ProxyConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            root_folder: None,
            timeout_secs: 30,
            user_agent: None,
            image_mode: ImageMode::default(),
            descriptor_proxies: default_descriptor_proxies(),
            image_proxies: default_image_proxies(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks what deserialization alone can't.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            exn::bail!(ErrorKind::MissingApiKey);
        }
        for proxy in self.descriptor_proxies.iter().chain(&self.image_proxies) {
            if !is_http_url(&proxy.endpoint) {
                exn::bail!(ErrorKind::InvalidProxy(proxy.endpoint.clone()));
            }
        }
        Ok(())
    }
}

fn is_http_url(endpoint: &str) -> bool {
    let endpoint = endpoint.to_ascii_lowercase();
    ["https://", "http://"].iter().any(|scheme| endpoint.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}
