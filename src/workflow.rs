//! Restore, install, save
//!
//! `InstallWorkflow` sequences its three collaborators strictly in order and
//! only saves a new cache when the restore missed. Errors from any step end
//! the run unchanged.

use crate::error::ActionResult;
use crate::install::InstallOptions;
use async_trait::async_trait;
use std::fmt;
use tracing::info;

/// Result of the restore step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The exact cache key was restored
    Hit,
    /// Nothing, or only a fallback entry, was restored
    Miss,
}

impl CacheOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit)
    }
}

impl From<bool> for CacheOutcome {
    fn from(hit: bool) -> Self {
        if hit {
            Self::Hit
        } else {
            Self::Miss
        }
    }
}

impl fmt::Display for CacheOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => write!(f, "hit"),
            Self::Miss => write!(f, "miss"),
        }
    }
}

/// Restores a previously saved dependency cache
#[async_trait]
pub trait CacheRestorer: Send + Sync {
    async fn restore(&self) -> ActionResult<CacheOutcome>;
}

/// Runs the package manager install
#[async_trait]
pub trait DependencyInstaller: Send + Sync {
    async fn install(&self, opts: &InstallOptions) -> ActionResult<()>;
}

/// Persists the dependency cache for later runs
#[async_trait]
pub trait CacheSaver: Send + Sync {
    async fn save(&self) -> ActionResult<()>;
}

/// Cached install of one working directory
pub struct InstallWorkflow<'a> {
    restorer: &'a dyn CacheRestorer,
    installer: &'a dyn DependencyInstaller,
    saver: &'a dyn CacheSaver,
}

impl<'a> InstallWorkflow<'a> {
    pub fn new(
        restorer: &'a dyn CacheRestorer,
        installer: &'a dyn DependencyInstaller,
        saver: &'a dyn CacheSaver,
    ) -> Self {
        Self {
            restorer,
            installer,
            saver,
        }
    }

    /// Restore, install, then save on a miss
    pub async fn run(&self, opts: &InstallOptions) -> ActionResult<CacheOutcome> {
        let outcome = self.restorer.restore().await?;
        info!("Dependency cache {}", outcome);

        self.installer.install(opts).await?;

        if outcome.is_hit() {
            info!("Cache hit, skipping save");
        } else {
            self.saver.save().await?;
        }

        Ok(outcome)
    }
}

/// Restorer and saver that do nothing, for `--no-cache` runs
#[derive(Debug, Default)]
pub struct NoCache;

#[async_trait]
impl CacheRestorer for NoCache {
    async fn restore(&self) -> ActionResult<CacheOutcome> {
        Ok(CacheOutcome::Miss)
    }
}

#[async_trait]
impl CacheSaver for NoCache {
    async fn save(&self) -> ActionResult<()> {
        Ok(())
    }
}
