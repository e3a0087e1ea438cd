//! Dependency installation
//!
//! Maps `InstallOptions` to exactly one package manager invocation:
//!
//! | Manager | Lockfile | Env export | Command |
//! |---------|----------|------------|---------|
//! | yarn | yes | - | `yarn --frozen-lockfile` |
//! | yarn | no | - | `yarn` |
//! | npm | yes | `npm_config_cache` | `npm ci` |
//! | npm | no | `npm_config_cache` | `npm install` |
//!
//! A custom install command bypasses the table and runs verbatim.

use crate::cache::PackageManager;
use crate::error::ActionResult;
use crate::toolkit::{quote_path, EnvExporter, ExecOptions, ExecutableResolver, ProcessRunner};
use crate::workflow::DependencyInstaller;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable npm reads its cache directory from
pub const NPM_CACHE_ENV: &str = "npm_config_cache";

/// Per-directory install settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    /// Use Yarn instead of npm
    pub use_yarn: bool,
    /// A lockfile for the chosen manager exists
    pub has_lock_file: bool,
    /// Directory containing package.json
    pub working_directory: PathBuf,
    /// npm's download cache folder
    pub npm_cache_folder: PathBuf,
    /// Command line that replaces the default install command
    pub install_command: Option<String>,
}

impl InstallOptions {
    pub fn package_manager(&self) -> PackageManager {
        if self.use_yarn {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    /// Arguments for the default install command of the chosen manager
    pub fn install_args(&self) -> Vec<String> {
        let args: &[&str] = match (self.use_yarn, self.has_lock_file) {
            (true, true) => &["--frozen-lockfile"],
            (true, false) => &[],
            (false, true) => &["ci"],
            (false, false) => &["install"],
        };
        args.iter().map(|a| a.to_string()).collect()
    }
}

/// Installs dependencies through the toolkit collaborators
pub struct Installer<R, E, P> {
    resolver: R,
    exporter: E,
    runner: P,
}

impl<R, E, P> Installer<R, E, P>
where
    R: ExecutableResolver,
    E: EnvExporter,
    P: ProcessRunner,
{
    pub fn new(resolver: R, exporter: E, runner: P) -> Self {
        Self {
            resolver,
            exporter,
            runner,
        }
    }

    /// Run the install command for `opts`
    pub async fn install(&self, opts: &InstallOptions) -> ActionResult<()> {
        let exec_opts = ExecOptions::in_dir(&opts.working_directory);

        if let Some(ref command) = opts.install_command {
            info!("Installing with custom command: {}", command);
            return self.runner.exec(command, &[], &exec_opts).await;
        }

        let manager = opts.package_manager();
        if manager == PackageManager::Npm {
            // npm must see the cache folder before it starts
            self.exporter.export_variable(
                NPM_CACHE_ENV,
                &opts.npm_cache_folder.to_string_lossy(),
            )?;
        }

        let tool = self.resolver.which(manager.binary()).await?;
        let args = opts.install_args();
        debug!("Using {} at {}", manager, tool.display());
        info!(
            "Installing dependencies with {} {}",
            manager,
            args.join(" ")
        );

        self.runner.exec(&quote_path(&tool), &args, &exec_opts).await
    }
}

#[async_trait]
impl<R, E, P> DependencyInstaller for Installer<R, E, P>
where
    R: ExecutableResolver,
    E: EnvExporter,
    P: ProcessRunner,
{
    async fn install(&self, opts: &InstallOptions) -> ActionResult<()> {
        Installer::install(self, opts).await
    }
}
