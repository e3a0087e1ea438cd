//! Turn CLI arguments and configuration into per-directory install plans

use crate::cache::key::{default_npm_cache_folder, KeySettings};
use crate::cache::lockfile::dependency_hash;
use crate::cache::{detect_package_manager, find_lockfile, CacheParams, PackageManager};
use crate::cli::args::CacheKeyArgs;
use crate::config::{Config, ManagerChoice};
use crate::error::{ActionError, ActionResult};
use crate::install::InstallOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings shared by every working directory of a run
#[derive(Debug, Clone)]
pub struct Settings {
    pub package_manager: ManagerChoice,
    pub home_dir: PathBuf,
    pub npm_cache_folder: PathBuf,
    pub install_command: Option<String>,
    pub key: KeySettings,
}

impl Settings {
    /// Merge flags over the config file
    ///
    /// The npm cache folder is made absolute: npm runs inside each working
    /// directory, while the cache store reads it from the current one.
    pub fn resolve(
        args: &CacheKeyArgs,
        install_command: Option<String>,
        config: &Config,
    ) -> ActionResult<Self> {
        let home_dir = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
        let npm_cache_folder = args
            .cache_folder
            .clone()
            .or_else(|| config.install.npm_cache_folder.clone())
            .unwrap_or_else(|| default_npm_cache_folder(&home_dir));
        let npm_cache_folder = absolute(npm_cache_folder)?;

        Ok(Self {
            package_manager: args
                .package_manager
                .unwrap_or(config.install.package_manager),
            home_dir,
            npm_cache_folder,
            install_command: install_command
                .filter(|c| !c.trim().is_empty())
                .or_else(|| config.install.install_command.clone()),
            key: KeySettings {
                prefix: args
                    .cache_key_prefix
                    .clone()
                    .or_else(|| config.cache.key_prefix.clone()),
                use_rolling_cache: args.use_rolling_cache || config.cache.use_rolling_cache,
            },
        })
    }
}

/// Resolve a relative path against the current directory
pub(crate) fn absolute(path: PathBuf) -> ActionResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd =
        std::env::current_dir().map_err(|e| ActionError::io("getting current directory", e))?;
    Ok(cwd.join(path))
}

/// Everything needed to install one working directory
#[derive(Debug, Clone)]
pub struct DirectoryPlan {
    pub manager: PackageManager,
    pub options: InstallOptions,
    pub params: CacheParams,
}

/// Detect the package manager and lockfile of `dir` and derive its cache key
pub fn plan(dir: &Path, settings: &Settings) -> ActionResult<DirectoryPlan> {
    let manager = match settings.package_manager {
        ManagerChoice::Auto => detect_package_manager(dir),
        ManagerChoice::Npm => PackageManager::Npm,
        ManagerChoice::Yarn => PackageManager::Yarn,
    };

    let lockfile = find_lockfile(dir, manager)?;
    let hash = dependency_hash(dir, lockfile.as_ref())?;
    let params = CacheParams::derive(
        manager,
        &hash,
        &settings.home_dir,
        &settings.npm_cache_folder,
        &settings.key,
    );
    debug!("{}: {} with key {}", dir.display(), manager, params.primary_key);

    Ok(DirectoryPlan {
        manager,
        options: InstallOptions {
            use_yarn: manager == PackageManager::Yarn,
            has_lock_file: lockfile.is_some(),
            working_directory: dir.to_path_buf(),
            npm_cache_folder: settings.npm_cache_folder.clone(),
            install_command: settings.install_command.clone(),
        },
        params,
    })
}
