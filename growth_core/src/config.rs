//! Configuration file support for growthz.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/growthz/config.toml`.

use crate::{Error, Locale, Result, WeightForHeightLookup};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Engine behaviour knobs
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AnalysisConfig {
    /// Nearest-row (default) or interpolated weight-for-height lookup
    #[serde(default)]
    pub weight_for_height_lookup: WeightForHeightLookup,
}

/// Presentation settings
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
}

/// The subset of configuration the engine functions need
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub locale: Locale,
    pub weight_for_height_lookup: WeightForHeightLookup,
}

impl AnalysisOptions {
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        base.join("growthz").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            locale: self.display.locale,
            weight_for_height_lookup: self.analysis.weight_for_height_lookup,
        }
    }
}
