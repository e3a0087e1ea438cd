//! Lockfile detection and hashing for content-addressed caching
//!
//! Detects which package manager a project uses and hashes its lockfile so
//! the cache key changes whenever the pinned dependency set changes.

use crate::error::{ActionError, ActionResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project manifest, hashed when no lockfile exists
pub const MANIFEST_FILE: &str = "package.json";

/// Supported Node.js package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// npm (package-lock.json, npm-shrinkwrap.json)
    Npm,
    /// Yarn (yarn.lock)
    Yarn,
}

impl PackageManager {
    /// Executable name looked up on `PATH`
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
        }
    }

    /// Lockfile names in lookup order
    fn lockfile_patterns(&self) -> &'static [&'static str] {
        match self {
            Self::Npm => &["package-lock.json", "npm-shrinkwrap.json"],
            Self::Yarn => &["yarn.lock"],
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// Information about a detected lockfile
#[derive(Debug, Clone)]
pub struct LockfileInfo {
    /// The package manager this lockfile belongs to
    pub manager: PackageManager,
    /// Path to the lockfile
    pub path: PathBuf,
    /// SHA256 hash of the lockfile contents
    pub hash: String,
}

/// Hash a file's contents using SHA256, returning lowercase hex
pub fn hash_file_contents(path: &Path) -> ActionResult<String> {
    let contents = fs::read(path)
        .map_err(|e| ActionError::io(format!("reading {}", path.display()), e))?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex::encode(hasher.finalize()))
}

/// Yarn when `yarn.lock` exists, npm otherwise
pub fn detect_package_manager(project_dir: &Path) -> PackageManager {
    if find_lockfile_path(project_dir, PackageManager::Yarn).is_some() {
        PackageManager::Yarn
    } else {
        PackageManager::Npm
    }
}

fn find_lockfile_path(project_dir: &Path, manager: PackageManager) -> Option<PathBuf> {
    manager
        .lockfile_patterns()
        .iter()
        .map(|pattern| project_dir.join(pattern))
        .find(|path| path.is_file())
}

/// Find and hash the lockfile of `manager` in `project_dir`
pub fn find_lockfile(
    project_dir: &Path,
    manager: PackageManager,
) -> ActionResult<Option<LockfileInfo>> {
    let Some(path) = find_lockfile_path(project_dir, manager) else {
        debug!("No {} lockfile in {}", manager, project_dir.display());
        return Ok(None);
    };

    debug!("Found {} lockfile: {}", manager, path.display());
    let hash = hash_file_contents(&path)?;
    Ok(Some(LockfileInfo {
        manager,
        path,
        hash,
    }))
}

/// Hash identifying the dependency set: the lockfile, else package.json
pub fn dependency_hash(project_dir: &Path, lockfile: Option<&LockfileInfo>) -> ActionResult<String> {
    if let Some(info) = lockfile {
        return Ok(info.hash.clone());
    }

    let manifest = project_dir.join(MANIFEST_FILE);
    if !manifest.is_file() {
        return Err(ActionError::ManifestNotFound(project_dir.to_path_buf()));
    }
    debug!("Hashing {} in place of a lockfile", manifest.display());
    hash_file_contents(&manifest)
}
