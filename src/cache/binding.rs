//! Binds a cache store to one working directory's cache parameters

use crate::cache::key::CacheParams;
use crate::cache::store::CacheStore;
use crate::error::ActionResult;
use crate::workflow::{CacheOutcome, CacheRestorer, CacheSaver};
use async_trait::async_trait;
use tracing::{debug, info};

/// Restores and saves the dependency cache described by `CacheParams`
pub struct CacheBinding<S> {
    store: S,
    params: CacheParams,
}

impl<S: CacheStore> CacheBinding<S> {
    pub fn new(store: S, params: CacheParams) -> Self {
        Self { store, params }
    }
}

#[async_trait]
impl<S: CacheStore> CacheRestorer for CacheBinding<S> {
    /// Only an exact primary-key match counts as a hit
    async fn restore(&self) -> ActionResult<CacheOutcome> {
        debug!("Trying to restore cache {}", self.params.primary_key);
        let restored = self
            .store
            .restore(
                &self.params.input_paths,
                &self.params.primary_key,
                &self.params.restore_keys,
            )
            .await?;

        match restored {
            Some(key) if key == self.params.primary_key => {
                info!("Cache restored from key: {}", key);
                Ok(CacheOutcome::Hit)
            }
            Some(key) => {
                info!("Partial cache restored from key: {}", key);
                Ok(CacheOutcome::Miss)
            }
            None => {
                info!("Cache not found for key: {}", self.params.primary_key);
                Ok(CacheOutcome::Miss)
            }
        }
    }
}

#[async_trait]
impl<S: CacheStore> CacheSaver for CacheBinding<S> {
    async fn save(&self) -> ActionResult<()> {
        debug!("Saving cache {}", self.params.primary_key);
        self.store
            .save(&self.params.input_paths, &self.params.primary_key)
            .await
    }
}
