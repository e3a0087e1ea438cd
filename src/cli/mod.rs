//! Command-line interface

mod args;
pub mod commands;

pub use args::{
    CacheKeyArgs, Cli, Commands, ConfigAction, ConfigArgs, InstallArgs, KeyArgs, OutputFormat,
};
