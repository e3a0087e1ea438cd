//! Cache key derivation
//!
//! Keys look like `npm-linux-x64-<sha256>` or, with a rolling cache,
//! `yarn-darwin-arm64-2024-05-<sha256>`. Platform and architecture use the
//! names Node.js reports so keys line up with other Node tooling.

use crate::cache::lockfile::PackageManager;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How the key is composed
#[derive(Debug, Clone, Default)]
pub struct KeySettings {
    /// Replaces the package manager name as the first key segment
    pub prefix: Option<String>,
    /// Add a year-month segment so the cache is rebuilt monthly
    pub use_rolling_cache: bool,
}

/// What to cache and under which key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheParams {
    /// Directories saved into and restored from the cache
    pub input_paths: Vec<PathBuf>,
    /// Exact key for this dependency set
    pub primary_key: String,
    /// Prefixes accepted as a fallback restore
    pub restore_keys: Vec<String>,
}

impl CacheParams {
    /// Derive cache parameters for the current month
    pub fn derive(
        manager: PackageManager,
        lock_hash: &str,
        home_dir: &Path,
        npm_cache_folder: &Path,
        settings: &KeySettings,
    ) -> Self {
        Self::derive_at(
            manager,
            lock_hash,
            home_dir,
            npm_cache_folder,
            settings,
            Utc::now(),
        )
    }

    pub fn derive_at(
        manager: PackageManager,
        lock_hash: &str,
        home_dir: &Path,
        npm_cache_folder: &Path,
        settings: &KeySettings,
        now: DateTime<Utc>,
    ) -> Self {
        let input_paths = match manager {
            PackageManager::Yarn => vec![yarn_cache_folder(home_dir)],
            PackageManager::Npm => vec![npm_cache_folder.to_path_buf()],
        };

        let prefix = settings
            .prefix
            .clone()
            .unwrap_or_else(|| manager.to_string());
        let mut segments = vec![prefix, node_platform().to_string(), node_arch().to_string()];
        if settings.use_rolling_cache {
            segments.push(now.format("%Y-%m").to_string());
        }

        let restore_key = format!("{}-", segments.join("-"));
        segments.push(lock_hash.to_string());

        Self {
            input_paths,
            primary_key: segments.join("-"),
            restore_keys: vec![restore_key],
        }
    }
}

/// Yarn v1 global cache under the user's home
pub fn yarn_cache_folder(home_dir: &Path) -> PathBuf {
    home_dir.join(".cache").join("yarn")
}

/// Default npm cache folder under the user's home
pub fn default_npm_cache_folder(home_dir: &Path) -> PathBuf {
    home_dir.join(".npm")
}

/// `process.platform` naming
pub fn node_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

/// `process.arch` naming
pub fn node_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}
