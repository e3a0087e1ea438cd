//! Executable lookup on the search path

use crate::error::{ActionError, ActionResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Locates a binary by name
#[async_trait]
pub trait ExecutableResolver: Send + Sync {
    /// Resolve `name` to an absolute path, failing if it is not installed
    async fn which(&self, name: &str) -> ActionResult<PathBuf>;
}

/// Resolver that searches `PATH` (and `PATHEXT` on Windows)
#[derive(Debug, Default)]
pub struct PathResolver;

impl PathResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExecutableResolver for PathResolver {
    async fn which(&self, name: &str) -> ActionResult<PathBuf> {
        let path = which::which(name).map_err(|e| ActionError::ExecutableNotFound {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        debug!("Resolved {} to {}", name, path.display());
        Ok(path)
    }
}
