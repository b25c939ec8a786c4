use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scrape_client::{save_file, ApiSettings, PersistError};
use scrape_logging::{scrape_info, scrape_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = ".scrape_client.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write config: {0}")]
    Persist(#[from] PersistError),
}

/// Settings remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overrides the default API base URL. `SCRAPER_API_URL` wins over this.
    pub api_url: Option<String>,
    pub authorization_token: Option<String>,
    pub max_depth: u8,
    pub include_images: bool,
    pub poll_interval_ms: u64,
    pub export_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            authorization_token: None,
            max_depth: 3,
            include_images: true,
            poll_interval_ms: 2000,
            export_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// API settings from this config with `override_url` (flag or env) on top.
    pub fn api_settings(&self, override_url: Option<&str>) -> ApiSettings {
        let settings = match self.api_url.as_deref() {
            Some(url) if !url.trim().is_empty() => ApiSettings::default().with_base_url(url),
            _ => ApiSettings::default(),
        };
        settings.with_env_override(override_url)
    }
}

/// Reads `{dir}/.scrape_client.ron`. A missing file gives the defaults; an
/// unreadable or malformed one is logged and also gives the defaults.
pub fn load_config(dir: &Path) -> ClientConfig {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return ClientConfig::default();
        }
        Err(err) => {
            scrape_warn!("Failed to read config from {:?}: {}", path, err);
            return ClientConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            scrape_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            scrape_warn!("Failed to parse config from {:?}: {}", path, err);
            ClientConfig::default()
        }
    }
}

pub fn save_config(dir: &Path, config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty)?;
    let path = save_file(dir, CONFIG_FILENAME, content.as_bytes())?;
    scrape_info!("Saved config to {:?}", path);
    Ok(path)
}
