use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT_TEMPLATE: &str =
    "https://script.google.com/macros/s/{deployment_id}/exec";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// User-level settings read from `config.toml`.
///
/// Everything here is optional; the persisted checklist state (deployment id,
/// display name, custom order) lives in the config store instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL template for the sheet endpoint. `{deployment_id}` is substituted.
    #[serde(default)]
    pub endpoint_template: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub search_debounce_ms: Option<u64>,
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/checkit/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("checkit/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("checkit\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Reads a config file, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn effective_endpoint_template(&self) -> &str {
        self.endpoint_template
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT_TEMPLATE)
    }

    pub fn endpoint_url(&self, deployment_id: &str) -> String {
        self.effective_endpoint_template()
            .replace("{deployment_id}", deployment_id)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms.unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS))
    }

    /// Location of the persisted config store.
    pub fn effective_store_path(&self) -> Option<PathBuf> {
        self.store_path
            .clone()
            .or_else(|| dirs::data_dir().map(|data| data.join("checkit").join("storage.json")))
    }

    pub fn effective_export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
