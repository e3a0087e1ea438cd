//! CLI command implementations

pub mod config;
pub mod install;
pub mod key;
pub mod plan;

pub use config::execute as config;
pub use install::execute as install;
pub use key::execute as key;
