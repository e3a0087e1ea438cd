//! CLI argument definitions using clap derive
//!
//! Action inputs arrive as `INPUT_<NAME>` environment variables, so the
//! install flags also read those.

use crate::config::ManagerChoice;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// npm-install - cached Node.js dependency install for CI
///
/// Restores the package manager cache keyed by the lockfile hash, installs
/// dependencies with npm or Yarn, and saves a fresh cache on a miss.
#[derive(Parser, Debug)]
#[command(name = "npm-install")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NPM_INSTALL_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore cache, install dependencies, save cache on a miss
    Install(InstallArgs),

    /// Print the cache key and paths for a project
    Key(KeyArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Options shared by every command that derives a cache key
#[derive(Args, Debug, Clone, Default)]
pub struct CacheKeyArgs {
    /// Package manager to use
    #[arg(long, value_enum, env = "INPUT_PACKAGE-MANAGER")]
    pub package_manager: Option<ManagerChoice>,

    /// npm cache folder (default: ~/.npm)
    #[arg(long, env = "INPUT_CACHE-FOLDER")]
    pub cache_folder: Option<PathBuf>,

    /// Replace the package manager name at the start of the cache key
    #[arg(long, env = "INPUT_CACHE-KEY-PREFIX")]
    pub cache_key_prefix: Option<String>,

    /// Roll the cache over every month
    #[arg(long, env = "INPUT_USEROLLINGCACHE")]
    pub use_rolling_cache: bool,
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Project directories, processed in order (newline-separated in the env var)
    #[arg(
        short,
        long = "working-directory",
        env = "INPUT_WORKING-DIRECTORY",
        value_delimiter = '\n'
    )]
    pub working_directory: Vec<String>,

    /// Run this command line instead of the default install command
    #[arg(long, env = "INPUT_INSTALL-COMMAND")]
    pub install_command: Option<String>,

    /// Directory holding cache entries
    #[arg(long, env = "NPM_INSTALL_CACHE_DIR")]
    pub cache_root: Option<PathBuf>,

    /// Skip restoring and saving the cache
    #[arg(long)]
    pub no_cache: bool,

    #[command(flatten)]
    pub key: CacheKeyArgs,
}

/// Arguments for the key command
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Project directory (defaults to current directory)
    #[arg(short, long = "working-directory")]
    pub working_directory: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub key: CacheKeyArgs,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for the key command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}
