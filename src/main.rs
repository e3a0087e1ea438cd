//! npm-install - cached dependency install for CI
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use npm_install::cli::{Cli, Commands};
use npm_install::config::{Config, ConfigManager};
use npm_install::error::ActionResult;
use npm_install::toolkit::annotate_error;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            annotate_error(&e.to_string());
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ActionResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config file {}", config_manager.path().display());

    match cli.command {
        Commands::Install(args) => npm_install::cli::commands::install(args, &config).await,
        Commands::Key(args) => npm_install::cli::commands::key(args, &config).await,
        Commands::Config(args) => {
            npm_install::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// 0 = info, 1 = debug, 2+ = trace. `RUST_LOG` wins when set.
fn init_logging(verbose: u8, config: &Config) {
    let step_debug = std::env::var("ACTIONS_STEP_DEBUG").as_deref() == Ok("true");
    let level = match verbose {
        0 if step_debug => "debug",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("npm_install={level}")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
