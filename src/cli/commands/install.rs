//! Install command - cached dependency install for each working directory

use crate::cache::{CacheBinding, LocalCacheStore};
use crate::cli::args::InstallArgs;
use crate::cli::commands::plan::{absolute, plan, Settings};
use crate::config::{Config, ConfigManager};
use crate::error::{ActionError, ActionResult};
use crate::install::Installer;
use crate::toolkit::{EnvExporter, GithubEnvExporter, PathResolver, TokioProcessRunner};
use crate::workflow::{InstallWorkflow, NoCache};
use console::style;
use std::path::PathBuf;
use tracing::info;

/// Step output reporting whether the exact cache key was restored
const CACHE_HIT_OUTPUT: &str = "cache-hit";

/// Execute the install command
pub async fn execute(args: InstallArgs, config: &Config) -> ActionResult<()> {
    let settings = Settings::resolve(&args.key, args.install_command.clone(), config)?;
    let directories = working_directories(&args.working_directory)?;

    let cache_enabled = config.cache.enabled && !args.no_cache;
    let cache_root = args
        .cache_root
        .clone()
        .or_else(|| config.cache.root.clone())
        .unwrap_or_else(ConfigManager::default_cache_root);
    let store = LocalCacheStore::new(cache_root);

    let installer = Installer::new(
        PathResolver::new(),
        GithubEnvExporter::from_env(),
        TokioProcessRunner::new(),
    );
    let outputs = GithubEnvExporter::from_env();

    for dir in &directories {
        let plan = plan(dir, &settings)?;
        info!(
            "Installing {} dependencies in {}",
            plan.manager,
            dir.display()
        );

        let outcome = if cache_enabled {
            info!("Cache key: {}", plan.params.primary_key);
            let binding = CacheBinding::new(store.clone(), plan.params.clone());
            InstallWorkflow::new(&binding, &installer, &binding)
                .run(&plan.options)
                .await?
        } else {
            info!("Caching disabled");
            InstallWorkflow::new(&NoCache, &installer, &NoCache)
                .run(&plan.options)
                .await?
        };

        outputs.set_output(CACHE_HIT_OUTPUT, &outcome.is_hit().to_string())?;
        println!(
            "{} {} (cache {})",
            style("[OK]").green(),
            dir.display(),
            outcome
        );
    }

    Ok(())
}

/// Non-empty, trimmed, absolute working directories; the current directory if none given
fn working_directories(raw: &[String]) -> ActionResult<Vec<PathBuf>> {
    let dirs = raw
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(|d| absolute(PathBuf::from(d)))
        .collect::<ActionResult<Vec<_>>>()?;

    if !dirs.is_empty() {
        return Ok(dirs);
    }

    let cwd =
        std::env::current_dir().map_err(|e| ActionError::io("getting current directory", e))?;
    Ok(vec![cwd])
}
