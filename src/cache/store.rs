//! Cache storage
//!
//! `CacheStore` is the storage boundary: restore a set of directories by key,
//! or save them under a key. `LocalCacheStore` keeps entries on disk:
//!
//! ```text
//! <root>/<entry>/manifest.json
//! <root>/<entry>/paths/0/...     first input path
//! <root>/<entry>/paths/1/...     second input path
//! ```
//!
//! `<entry>` is the key with unsafe characters replaced, plus a short digest
//! of the raw key so keys that sanitize alike stay apart.
//!
//! Entries are immutable once written. Saves go to a staging directory that
//! is renamed into place, so a crashed save never leaves a half entry behind.

use crate::error::{ActionError, ActionResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const MANIFEST_FILE: &str = "manifest.json";
const PATHS_DIR: &str = "paths";
const STAGING_PREFIX: &str = ".staging-";
const KEY_DIGEST_LEN: usize = 8;

/// Persists and restores directory trees under a key
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Restore `paths` from the entry matching `primary_key`, or else the newest
    /// entry whose key starts with one of `restore_keys`.
    ///
    /// Returns the key that was restored, if any.
    async fn restore(
        &self,
        paths: &[PathBuf],
        primary_key: &str,
        restore_keys: &[String],
    ) -> ActionResult<Option<String>>;

    /// Save `paths` under `key`
    async fn save(&self, paths: &[PathBuf], key: &str) -> ActionResult<()>;
}

/// Metadata stored alongside each entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryManifest {
    key: String,
    created_at: DateTime<Utc>,
    paths: Vec<PathBuf>,
}

/// Cache store backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalCacheStore {
    root: PathBuf,
}

impl LocalCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.root.join(entry_name(key))
    }

    fn read_manifest(dir: &Path) -> Option<EntryManifest> {
        let content = fs::read_to_string(dir.join(MANIFEST_FILE)).ok()?;
        match serde_json::from_str(&content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!("Ignoring cache entry {}: {}", dir.display(), e);
                None
            }
        }
    }

    /// Locate the entry to restore from, honouring key priority
    fn find_entry(
        &self,
        paths: &[PathBuf],
        primary_key: &str,
        restore_keys: &[String],
    ) -> io::Result<Option<(PathBuf, EntryManifest)>> {
        let exact = self.entry_dir(primary_key);
        if let Some(manifest) = Self::read_manifest(&exact) {
            if manifest.key == primary_key && manifest.paths.len() == paths.len() {
                return Ok(Some((exact, manifest)));
            }
        }

        if restore_keys.is_empty() || !self.root.is_dir() {
            return Ok(None);
        }

        let mut candidates = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let dir = entry?.path();
            let is_staging = dir
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(STAGING_PREFIX));
            if is_staging || !dir.is_dir() {
                continue;
            }
            if let Some(manifest) = Self::read_manifest(&dir) {
                if manifest.paths.len() == paths.len() {
                    candidates.push((dir, manifest));
                }
            }
        }

        for prefix in restore_keys {
            let newest = candidates
                .iter()
                .filter(|(_, m)| m.key.starts_with(prefix.as_str()))
                .max_by_key(|(_, m)| m.created_at);
            if let Some((dir, manifest)) = newest {
                return Ok(Some((dir.clone(), manifest.clone())));
            }
        }

        Ok(None)
    }

    fn restore_blocking(
        &self,
        paths: &[PathBuf],
        primary_key: &str,
        restore_keys: &[String],
    ) -> io::Result<Option<String>> {
        let Some((dir, manifest)) = self.find_entry(paths, primary_key, restore_keys)? else {
            return Ok(None);
        };

        debug!("Restoring {} from {}", manifest.key, dir.display());
        for (index, target) in paths.iter().enumerate() {
            let source = dir.join(PATHS_DIR).join(index.to_string());
            if source.is_dir() {
                copy_tree(&source, target)?;
            }
        }
        Ok(Some(manifest.key))
    }

    fn save_blocking(&self, paths: &[PathBuf], key: &str) -> ActionResult<()> {
        let entry = self.entry_dir(key);
        if entry.join(MANIFEST_FILE).is_file() {
            info!("Cache entry {} already exists, not overwriting", key);
            return Ok(());
        }

        if !paths.iter().any(|p| p.exists()) {
            return Err(ActionError::CachePathsMissing(paths.to_vec()));
        }

        let staging = self.root.join(format!(
            "{}{}-{}",
            STAGING_PREFIX,
            entry_name(key),
            std::process::id()
        ));
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .map_err(|e| save_error(key, "clearing staging directory", e))?;
        }

        if let Err(e) = Self::stage_entry(&staging, paths, key) {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        if let Err(e) = fs::rename(&staging, &entry) {
            // Another job may have committed the same key first
            let _ = fs::remove_dir_all(&staging);
            if entry.join(MANIFEST_FILE).is_file() {
                info!("Cache entry {} was saved concurrently", key);
                return Ok(());
            }
            return Err(save_error(key, "committing cache entry", e));
        }

        info!("Cache saved with key: {}", key);
        Ok(())
    }

    /// Copy `paths` and the manifest into `staging`
    fn stage_entry(staging: &Path, paths: &[PathBuf], key: &str) -> ActionResult<()> {
        fs::create_dir_all(staging)
            .map_err(|e| save_error(key, "creating staging directory", e))?;

        for (index, source) in paths.iter().enumerate() {
            if !source.exists() {
                warn!("Cache path {} does not exist, skipping", source.display());
                continue;
            }
            let target = staging.join(PATHS_DIR).join(index.to_string());
            copy_tree(source, &target)
                .map_err(|e| save_error(key, &format!("copying {}", source.display()), e))?;
        }

        let manifest = EntryManifest {
            key: key.to_string(),
            created_at: Utc::now(),
            paths: paths.to_vec(),
        };
        fs::write(
            staging.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&manifest)?,
        )
        .map_err(|e| save_error(key, "writing manifest", e))
    }
}

fn save_error(key: &str, context: &str, e: io::Error) -> ActionError {
    ActionError::CacheSave {
        key: key.to_string(),
        reason: format!("{context}: {e}"),
    }
}

#[async_trait]
impl CacheStore for LocalCacheStore {
    async fn restore(
        &self,
        paths: &[PathBuf],
        primary_key: &str,
        restore_keys: &[String],
    ) -> ActionResult<Option<String>> {
        let store = self.clone();
        let paths = paths.to_vec();
        let key = primary_key.to_string();
        let restore_keys = restore_keys.to_vec();

        let result = tokio::task::spawn_blocking(move || {
            store.restore_blocking(&paths, &key, &restore_keys)
        })
        .await
        .map_err(|e| ActionError::CacheRestore {
            key: primary_key.to_string(),
            reason: e.to_string(),
        })?;

        result.map_err(|e| ActionError::CacheRestore {
            key: primary_key.to_string(),
            reason: e.to_string(),
        })
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> ActionResult<()> {
        let store = self.clone();
        let paths = paths.to_vec();
        let owned_key = key.to_string();

        tokio::task::spawn_blocking(move || store.save_blocking(&paths, &owned_key))
            .await
            .map_err(|e| ActionError::CacheSave {
                key: key.to_string(),
                reason: e.to_string(),
            })?
    }
}

/// Map a key to a safe, collision-free directory name
fn entry_name(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    format!("{}-{}", sanitized, &digest[..KEY_DIGEST_LEN])
}

/// Recursively copy `source` into `target`, merging with existing contents
fn copy_tree(source: &Path, target: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let dest = target.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&dest)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    let pointee = fs::read_link(link)?;
    if dest.symlink_metadata().is_ok() {
        fs::remove_file(dest)?;
    }
    std::os::unix::fs::symlink(pointee, dest)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    if link.is_file() {
        fs::copy(link, dest)?;
    }
    Ok(())
}
