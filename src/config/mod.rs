//! Settings file for the install action
//!
//! Every field has a default, so a runner with no config file behaves like a
//! plain `npm ci`/`yarn --frozen-lockfile` with a local cache. Command-line
//! flags and `INPUT_*` variables are layered on top by the CLI.

pub mod schema;

pub use schema::{Config, ManagerChoice};

use crate::error::{ActionError, ActionResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Runner-provided directory that survives between jobs on self-hosted runners
const RUNNER_TOOL_CACHE_ENV: &str = "RUNNER_TOOL_CACHE";

/// Locates, reads and writes the action's TOML settings
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Use `path` instead of the per-user location (`--config`)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `~/.config/npm-install/config.toml` or the platform equivalent
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("npm-install")
            .join("config.toml")
    }

    /// Where dependency caches live when neither flag nor file names a root.
    ///
    /// `$RUNNER_TOOL_CACHE/npm-install` on a runner, otherwise the user's
    /// cache directory.
    pub fn default_cache_root() -> PathBuf {
        if let Some(tool_cache) = std::env::var_os(RUNNER_TOOL_CACHE_ENV).filter(|v| !v.is_empty())
        {
            return PathBuf::from(tool_cache).join("npm-install");
        }
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("npm-install")
    }

    /// Read the settings file; a missing file means all defaults
    pub async fn load(&self) -> ActionResult<Config> {
        if !self.config_path.exists() {
            debug!(
                "No settings at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path).await.map_err(|e| {
            ActionError::io(format!("reading config from {}", self.config_path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| ActionError::ConfigInvalid {
            path: self.config_path.clone(),
            reason: e.to_string(),
        })
    }

    /// Write `config`, creating parent directories (`config init`)
    pub async fn save(&self, config: &Config) -> ActionResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ActionError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            ActionError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Settings written to {}", self.config_path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
