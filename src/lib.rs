//! npm-install - cached Node.js dependency install for CI
//!
//! Restores the npm or Yarn cache keyed by the lockfile hash, installs
//! dependencies, and saves a fresh cache when the restore missed.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod toolkit;
pub mod workflow;

pub use error::{ActionError, ActionResult};
