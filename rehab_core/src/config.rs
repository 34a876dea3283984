//! Configuration file support for the rehab tools.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/rehab/config.toml`.

use crate::{ActivityLevel, Error, InjuryType, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Profile values used when a field is not given on the command line
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_age")]
    pub age: u32,

    #[serde(default = "default_injury_type")]
    pub injury_type: InjuryType,

    #[serde(default = "default_pain_level")]
    pub pain_level: u32,

    #[serde(default = "default_mobility_range")]
    pub mobility_range: u32,

    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default = "default_activity_level")]
    pub activity_level: ActivityLevel,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            age: default_age(),
            injury_type: default_injury_type(),
            pain_level: default_pain_level(),
            mobility_range: default_mobility_range(),
            weight: default_weight(),
            activity_level: default_activity_level(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("rehab")
}

fn default_age() -> u32 {
    30
}

fn default_injury_type() -> InjuryType {
    InjuryType::Knee
}

fn default_pain_level() -> u32 {
    5
}

fn default_mobility_range() -> u32 {
    50
}

fn default_weight() -> f64 {
    70.0
}

fn default_activity_level() -> ActivityLevel {
    ActivityLevel::Sedentary
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load from `path` when given, otherwise from the standard location
    ///
    /// An explicit path must exist; the standard location falls back to
    /// defaults when missing.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
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
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("rehab").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
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
}
