//! RON config loader
//!
//! Loads generator and session settings from a RON file, with fallback to
//! hardcoded defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::SessionConfig;
use crate::world::generation::GeneratorSettings;

/// Where the binary looks for its config unless told otherwise
pub const DEFAULT_CONFIG_PATH: &str = "assets/config/fogwood.ron";

/// Everything tunable about a run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FogwoodConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub session: SessionConfig,
}

impl FogwoodConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(ron::from_str(&content)?)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

/// Write the default config to `path` for easy editing
pub fn export_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(path, FogwoodConfig::default().to_ron()?)?;
    log::info!("Exported default config to {}", path.display());
    Ok(())
}
