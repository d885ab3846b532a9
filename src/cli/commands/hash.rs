//! Hash command - show the cache identity of a container path

use crate::cli::args::HashArgs;
use crate::config::Config;
use crate::error::VolmanResult;
use crate::volumes::{cache_volume_name, hash_path, resolver_for, PathStyle, VolumeError};

/// Execute the hash command
pub async fn execute(args: HashArgs, config: &Config) -> VolmanResult<()> {
    let style = args
        .platform
        .map(PathStyle::from)
        .unwrap_or(config.volumes.platform);
    let base_path = args
        .base_path
        .as_deref()
        .unwrap_or(&config.volumes.base_path);

    let destination = resolve(style, base_path, &args.path)?;
    println!("{}", hash_path(&destination));

    let unique_name = args
        .unique_name
        .as_deref()
        .unwrap_or(&config.volumes.unique_name);
    if !unique_name.is_empty() {
        println!("{}", cache_volume_name(unique_name, &destination));
    }

    Ok(())
}

/// Resolve `path` the same way the volume manager resolves destinations
fn resolve(style: PathStyle, base_path: &str, path: &str) -> Result<String, VolumeError> {
    let resolver = resolver_for(style);

    if resolver.is_root(path) {
        return Err(VolumeError::RootPath);
    }
    if resolver.is_abs(path) || base_path.is_empty() {
        return Ok(path.to_string());
    }
    Ok(resolver.join(base_path, path))
}
