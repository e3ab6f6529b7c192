use crate::Config;
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "VITRINA_";
const FILE_STEM: &str = "config";
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Assembles a [`Config`] from layered sources.
///
/// Every `with_*` call merges on top of what's already there, so call them
/// in increasing order of precedence.
///
/// ```no_run
/// use vitrina_config::ConfigLoader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConfigLoader::new().with_default_file()?.with_env().load()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader {
    figment: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader holding only the built-in defaults.
    pub fn new() -> Self {
        Self { figment: Figment::from(Serialized::defaults(Config::default())) }
    }

    /// Merge the first configuration file found in the platform configuration
    /// directory, if any.
    pub fn with_default_file(self) -> Result<Self> {
        match default_file() {
            Some(path) => self.with_file(path),
            None => Ok(self),
        }
    }

    /// Merge a configuration file. The format follows the extension.
    ///
    /// # Errors
    /// [`ErrorKind::Load`] if the file doesn't exist or the extension isn't
    /// one of `toml`, `yaml`, `yml` or `json`.
    pub fn with_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            exn::bail!(ErrorKind::Load);
        }
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        tracing::debug!(path = %path.display(), "Loading configuration file");
        let figment = match extension.as_deref() {
            Some("toml") => self.figment.merge(Toml::file_exact(path)),
            Some("yaml" | "yml") => self.figment.merge(Yaml::file_exact(path)),
            Some("json") => self.figment.merge(Json::file_exact(path)),
            _ => exn::bail!(ErrorKind::Load),
        };
        Ok(Self { figment })
    }

    /// Merge `VITRINA_*` environment variables (`VITRINA_API_KEY`,
    /// `VITRINA_TIMEOUT_SECS`, ...).
    pub fn with_env(self) -> Self {
        Self { figment: self.figment.merge(Env::prefixed(ENV_PREFIX).split("__")) }
    }

    /// Override the API key when one is given.
    pub fn with_api_key(self, api_key: Option<String>) -> Self {
        match api_key {
            Some(key) => Self { figment: self.figment.merge(Serialized::default("api_key", key)) },
            None => self,
        }
    }

    /// Extract and validate.
    pub fn load(self) -> Result<Config> {
        let config: Config = self.figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }
}

fn default_file() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "vitrina")?;
    EXTENSIONS
        .iter()
        .map(|extension| dirs.config_dir().join(format!("{FILE_STEM}.{extension}")))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use vitrina_catalog::ImageMode;
    use vitrina_fetch::{Envelope, ProxyConfig};

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.toml",
            r#"
                api_key = "from-file"
                root_folder = "ROOT"
                image_mode = "link"
                timeout_secs = 5

                [[descriptor_proxies]]
                endpoint = "https://relay.test/get?url="
                envelope = "json_contents"
            "#,
        );
        let config = ConfigLoader::new().with_file(path).unwrap().load().unwrap();
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.root_folder.as_deref(), Some("ROOT"));
        assert_eq!(config.image_mode, ImageMode::Link);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.descriptor_proxies, [ProxyConfig::json_contents("https://relay.test/get?url=")]);
        // Untouched keys keep their defaults.
        assert_eq!(config.image_proxies.len(), 3);
        assert_eq!(config.api_base, Config::default().api_base);
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "vitrina.yml",
            "api_key: yaml-key\nimage_proxies:\n  - endpoint: \"https://img.test/?\"\n",
        );
        let config = ConfigLoader::new().with_file(path).unwrap().load().unwrap();
        assert_eq!(config.api_key, "yaml-key");
        assert_eq!(config.image_proxies.len(), 1);
        assert_eq!(config.image_proxies[0].envelope, Envelope::Raw);
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", r#"{"api_key": "json-key", "image_proxies": []}"#);
        let config = ConfigLoader::new().with_file(path).unwrap().load().unwrap();
        assert_eq!(config.api_key, "json-key");
        assert!(config.image_proxies.is_empty());
    }

    #[test]
    fn test_api_key_override_wins() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.toml", r#"api_key = "from-file""#);
        let config =
            ConfigLoader::new().with_file(path).unwrap().with_api_key(Some("from-cli".to_string())).load().unwrap();
        assert_eq!(config.api_key, "from-cli");
    }

    #[test]
    fn test_missing_api_key() {
        let err = ConfigLoader::new().with_api_key(None).load().unwrap_err();
        assert_eq!(*err, ErrorKind::MissingApiKey);
    }

    #[test]
    fn test_invalid_proxy() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.toml", "api_key = \"k\"\n[[image_proxies]]\nendpoint = \"corsproxy.io/?\"\n");
        let err = ConfigLoader::new().with_file(path).unwrap().load().unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidProxy("corsproxy.io/?".to_string()));
    }

    #[test]
    fn test_wrong_type_is_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.toml", "api_key = \"k\"\ntimeout_secs = \"soon\"\n");
        let err = ConfigLoader::new().with_file(path).unwrap().load().unwrap_err();
        assert_eq!(*err, ErrorKind::Load);
    }

    #[test]
    fn test_unusable_files() {
        let dir = TempDir::new().unwrap();
        assert_eq!(*ConfigLoader::new().with_file(dir.path().join("missing.toml")).err().unwrap(), ErrorKind::Load);
        let ini = write(&dir, "config.ini", "api_key=k");
        assert_eq!(*ConfigLoader::new().with_file(ini).err().unwrap(), ErrorKind::Load);
    }
}
