//! Volman - mount and cache volume planning for job containers
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use volman::cli::args::{ConfigAction, ConfigArgs};
use volman::cli::{Cli, Commands};
use volman::config::{Config, ConfigManager};
use volman::error::VolmanResult;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> VolmanResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    // A broken config file must not block `config init --force`
    let config = match config_manager.load().await {
        Ok(config) => config,
        Err(_)
            if matches!(
                cli.command,
                Commands::Config(ConfigArgs {
                    action: Some(ConfigAction::Init { force: true })
                })
            ) =>
        {
            Config::default()
        }
        Err(e) => return Err(e),
    };

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("volman=warn"),
        1 => EnvFilter::new("volman=info"),
        _ => EnvFilter::new("volman=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.without_time().init();
    }

    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Plan(args) => volman::cli::commands::plan(args, &config).await,
        Commands::Hash(args) => volman::cli::commands::hash(args, &config).await,
        Commands::Config(args) => {
            volman::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
