use serde::{Deserialize, Serialize};

/// TermCon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermConConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Quit key, same syntax as `--quit`
    #[serde(default = "default_quit_key")]
    pub quit_key: String,
    /// Echo keyboard input locally
    #[serde(default)]
    pub echo: bool,
    /// Terminal used as the local side of the relay
    #[serde(default = "default_local_device")]
    pub local_device: String,
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_quit_key() -> String {
    "ctrl/a".to_string()
}

fn default_local_device() -> String {
    "/dev/tty".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            quit_key: default_quit_key(),
            echo: false,
            local_device: default_local_device(),
        }
    }
}
