//! Configuration schema for npm-install
//!
//! Configuration is stored at `~/.config/npm-install/config.toml`. Every
//! field has a default, so an empty or missing file is valid.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Install settings
    pub install: InstallConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Which package manager to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ManagerChoice {
    /// Yarn if yarn.lock exists, npm otherwise
    #[default]
    Auto,
    /// Always npm
    Npm,
    /// Always Yarn
    Yarn,
}

/// Install settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Package manager selection
    pub package_manager: ManagerChoice,

    /// npm cache folder (default: ~/.npm)
    pub npm_cache_folder: Option<PathBuf>,

    /// Custom install command line, replacing `npm ci` / `yarn --frozen-lockfile`
    pub install_command: Option<String>,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable dependency caching (default: true)
    pub enabled: bool,

    /// Directory holding cache entries (default: platform cache dir)
    pub root: Option<PathBuf>,

    /// First cache key segment, replacing the package manager name
    pub key_prefix: Option<String>,

    /// Add a year-month segment to the key so caches roll over monthly
    pub use_rolling_cache: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: None,
            key_prefix: None,
            use_rolling_cache: false,
        }
    }
}
