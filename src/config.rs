//! User configuration.
//!
//! Read from `~/.config/textcalc/config.toml` (or the platform's config
//! directory). Every key is optional:
//!
//! ```toml
//! [format]
//! precision = 14
//! lower_exp = 1e-6
//! upper_exp = 1e6
//!
//! [output]
//! json = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculator::{FormatOptions, MAX_PRECISION};

const APP_DIR: &str = "textcalc";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub format: FormatOptions,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print calculations as JSON lines instead of `expr = result`.
    pub json: bool,
}

/// `~/.config/textcalc/config.toml`
pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

impl Config {
    /// Load config from an explicit path, or from the default location.
    ///
    /// An explicit path must exist and parse. The default location is
    /// best-effort: a missing or broken file falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        let Some(path) = config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        match Self::from_file(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let format = &self.format;

        if format.precision == 0 || format.precision > MAX_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "format.precision must be between 1 and {}, got {}",
                MAX_PRECISION, format.precision
            )));
        }
        if !(format.lower_exp >= 0.0 && format.lower_exp <= format.upper_exp) {
            return Err(ConfigError::Invalid(format!(
                "format.lower_exp ({}) must be non-negative and not above format.upper_exp ({})",
                format.lower_exp, format.upper_exp
            )));
        }

        Ok(())
    }
}
