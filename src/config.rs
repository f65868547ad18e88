// Editor configuration stored as RON

use crate::command::state::Effects;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_DIR_NAME: &str = "image_editor";
const CONFIG_FILE_NAME: &str = "config.ron";

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Undo history settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo entries; `None` keeps everything
    pub max_depth: Option<usize>,
}

/// Settings applied when a session starts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub history: HistoryConfig,

    /// Effect values a new image starts from
    pub effects_defaults: Effects,
}

impl EditorConfig {
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(data)?)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, PrettyConfig::default())?)
    }

    /// Read a config file
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not valid RON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&data)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Read a config file, falling back to defaults if it is missing or
    /// malformed
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Write the config, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Per-user config location, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}
