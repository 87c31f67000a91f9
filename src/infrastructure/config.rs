use crate::domain::{config::TermConConfig, error::{TermConError, TermConResult}};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> Self {
        Self {
            global_config_path: Self::get_global_config_path(),
        }
    }

    /// Load configuration from the global file, falling back to defaults
    pub fn load_config(&self) -> TermConResult<TermConConfig> {
        match &self.global_config_path {
            Some(path) if path.exists() => self.load_config_from_path(path),
            _ => {
                debug!("No configuration file, using defaults");
                Ok(TermConConfig::default())
            }
        }
    }

    /// `~/.config/termcon/config.toml`, if a home directory is known
    fn get_global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("termcon").join("config.toml"))
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> TermConResult<TermConConfig> {
        let content = fs::read_to_string(path).map_err(|e| TermConError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| TermConError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
