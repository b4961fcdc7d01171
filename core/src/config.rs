//! Configuration persistence
//!
//! Re-exports the shared config types from volley-types and adds loading and
//! saving, either through confy's per-user config location or an explicit
//! TOML file.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use volley_types::{AutoFirePolicy, SchedulerConfig, SlotId, VolleyConfig, WeaponProfile};

const APP_NAME: &str = "volley";
const CONFIG_NAME: &str = "config";

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
}

/// Extension trait for VolleyConfig persistence
pub trait ConfigExt: Sized {
    /// Load from the per-user config location, falling back to defaults
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    /// Location confy reads and writes
    fn default_path() -> Result<PathBuf, ConfigError>;
    /// Load a TOML file. A missing file yields defaults.
    fn load_from_path(path: &Path) -> Result<Self, ConfigError>;
    fn save_to_path(&self, path: &Path) -> Result<(), ConfigError>;
}

impl ConfigExt for VolleyConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "using default configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self.clone()).map_err(ConfigError::Save)
    }

    fn default_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        std::fs::write(path, to_toml(self)?).map_err(write_err)
    }
}

/// Render a config as pretty TOML
pub fn to_toml(config: &VolleyConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}
