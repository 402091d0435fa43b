//! battstat configuration
//!
//! Config file: ~/.config/battstat/config.toml or /etc/battstat/config.toml.
//! Every setting is optional; command-line flags take precedence.

use crate::collector::{RegistrySource, DEFAULT_IOREG_PATH};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Color display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Plain text
    Never,
}

/// Report display settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show every non-excluded field instead of the curated subset
    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub color: ColorMode,

    /// Extra field names to hide, on top of the built-in exclusions
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Registry source settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: RegistrySource,

    #[serde(default = "default_ioreg_path")]
    pub ioreg_path: PathBuf,
}

fn default_ioreg_path() -> PathBuf {
    PathBuf::from(DEFAULT_IOREG_PATH)
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: RegistrySource::default(),
            ioreg_path: default_ioreg_path(),
        }
    }
}

/// Main battstat configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattstatConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub source: SourceConfig,
}

impl BattstatConfig {
    /// User config path: $XDG_CONFIG_HOME/battstat/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("battstat").join("config.toml"))
    }

    /// System config path
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/battstat/config.toml")
    }

    /// Read and parse one config file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: BattstatConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit path is used alone. Otherwise the user file, then the
    /// system file. A broken file is reported and defaults are used.
    pub fn load(explicit: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => Self::user_config_path()
                .into_iter()
                .chain(std::iter::once(Self::system_config_path()))
                .collect(),
        };

        for candidate in candidates {
            if explicit.is_none() && !candidate.exists() {
                continue;
            }
            match Self::load_from_path(&candidate) {
                Ok(config) => {
                    info!(path = %candidate.display(), "loaded config");
                    return config;
                }
                Err(e) => {
                    let reason = format!("{:#}", e);
                    warn!(path = %candidate.display(), error = %reason, "ignoring config");
                    return Self::default();
                }
            }
        }

        debug!("no config file found, using defaults");
        Self::default()
    }
}
