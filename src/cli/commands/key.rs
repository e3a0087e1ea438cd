//! Key command - show the cache key a project would use

use crate::cache::PackageManager;
use crate::cli::args::{KeyArgs, OutputFormat};
use crate::cli::commands::plan::{plan, Settings};
use crate::config::Config;
use crate::error::{ActionError, ActionResult};
use console::style;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

#[derive(Serialize)]
struct KeyJson {
    package_manager: PackageManager,
    lock_file: bool,
    primary_key: String,
    restore_keys: Vec<String>,
    paths: Vec<PathBuf>,
}

/// Execute the key command
pub async fn execute(args: KeyArgs, config: &Config) -> ActionResult<()> {
    let dir = match args.working_directory {
        Some(d) => d,
        None => env::current_dir().map_err(|e| ActionError::io("getting current directory", e))?,
    };

    let settings = Settings::resolve(&args.key, None, config)?;
    let plan = plan(&dir, &settings)?;

    match args.format {
        OutputFormat::Json => {
            let json = KeyJson {
                package_manager: plan.manager,
                lock_file: plan.options.has_lock_file,
                primary_key: plan.params.primary_key,
                restore_keys: plan.params.restore_keys,
                paths: plan.params.input_paths,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{}: {}", style("Package manager").bold(), plan.manager);
            println!(
                "{}: {}",
                style("Lockfile").bold(),
                if plan.options.has_lock_file { "yes" } else { "no" }
            );
            println!("{}: {}", style("Key").bold(), plan.params.primary_key);
            for key in &plan.params.restore_keys {
                println!("{}: {}", style("Restore key").bold(), key);
            }
            for path in &plan.params.input_paths {
                println!("{}: {}", style("Path").bold(), path.display());
            }
        }
    }

    Ok(())
}
