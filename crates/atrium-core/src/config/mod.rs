//! Configuration types for Atrium.
//!
//! Configuration is loaded from a single YAML file (atrium.yaml) into an
//! `AtriumConfig`. Every section has serde defaults so a minimal file (or an
//! empty one) still yields a usable configuration.

pub mod upstream;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use upstream::UpstreamConfig;

/// Complete Atrium configuration loaded from a file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AtriumConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,

    /// Upstream Postgres connection.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// User-visible notification settings.
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Settings for user-visible notifications (toasts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Whether notifications are emitted at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AtriumConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }
}
