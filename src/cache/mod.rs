//! Dependency cache
//!
//! Provides content-addressed caching keyed by lockfile hashes.
//!
//! # Restore outcomes
//!
//! | Match | Files restored | Outcome | Saved afterwards |
//! |-------|----------------|---------|------------------|
//! | Primary key | yes | hit | no |
//! | Restore-key prefix | yes | miss | yes |
//! | None | no | miss | yes |

pub mod binding;
pub mod key;
pub mod lockfile;
pub mod store;

pub use binding::CacheBinding;
pub use key::{CacheParams, KeySettings};
pub use lockfile::{detect_package_manager, find_lockfile, LockfileInfo, PackageManager};
pub use store::{CacheStore, LocalCacheStore};
