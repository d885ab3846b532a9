//! Plan command - resolve mounts into a bind list

use crate::cli::args::{OutputFormat, PlanArgs};
use crate::config::Config;
use crate::engine::{CliVolumeClient, DryRunClient, VolumeClient};
use crate::error::VolmanResult;
use crate::volumes::{create_parser, DefaultManager, ManagerConfig, PathStyle, VolumeManager};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Execute the plan command
pub async fn execute(args: PlanArgs, config: &Config) -> VolmanResult<()> {
    let manager_config = manager_config(&args, config);
    let platform = args
        .platform
        .map(PathStyle::from)
        .unwrap_or(config.volumes.platform);
    let client = create_client(&args, config);
    debug!(
        "Planning {} volume(s) for {} containers using {}",
        args.volumes.len() + args.temporary.len(),
        platform,
        client.engine_name()
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut manager = DefaultManager::new(client, create_parser(platform), manager_config);

    // The first failure aborts the whole plan
    for volume in &args.volumes {
        manager.create(&cancel, volume).await?;
    }
    for destination in &args.temporary {
        manager.create_temporary(&cancel, destination).await?;
    }

    let binds = manager.binds();
    info!("Planned {} bind(s)", binds.len());

    match args.format {
        OutputFormat::Table => print_binds_table(&binds),
        OutputFormat::Json => print_binds_json(&binds)?,
        OutputFormat::Plain => print_binds_plain(&binds),
    }

    Ok(())
}

/// Config file values overridden by command-line flags
fn manager_config(args: &PlanArgs, config: &Config) -> ManagerConfig {
    let mut manager_config = config.volumes.manager_config();

    if let Some(unique_name) = &args.unique_name {
        manager_config.unique_name = unique_name.clone();
    }
    if let Some(base_path) = &args.base_path {
        manager_config.base_path = base_path.clone();
    }
    if let Some(cache_dir) = &args.cache_dir {
        manager_config.cache_dir = cache_dir.clone();
    }
    if args.disable_cache {
        manager_config.disable_cache = true;
    }

    manager_config
}

fn create_client(args: &PlanArgs, config: &Config) -> Arc<dyn VolumeClient> {
    if args.dry_run {
        return Arc::new(DryRunClient);
    }

    let program = args
        .engine
        .clone()
        .unwrap_or_else(|| config.engine.program.clone());
    Arc::new(CliVolumeClient::new(program).with_timeout(config.engine.timeout()))
}

fn print_binds_table(binds: &[String]) {
    println!("{:<4} {}", "#", "BIND");
    println!("{}", "-".repeat(60));

    for (i, bind) in binds.iter().enumerate() {
        println!("{:<4} {}", i + 1, bind);
    }

    println!();
    println!("Total: {} bind(s)", binds.len());
}

fn print_binds_json(binds: &[String]) -> VolmanResult<()> {
    #[derive(serde::Serialize)]
    struct PlanJson<'a> {
        binds: &'a [String],
    }

    println!("{}", serde_json::to_string_pretty(&PlanJson { binds })?);
    Ok(())
}

fn print_binds_plain(binds: &[String]) {
    for bind in binds {
        println!("{}", bind);
    }
}
