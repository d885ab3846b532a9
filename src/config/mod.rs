//! Volman settings file
//!
//! A single TOML file, `volman/config.toml` under the platform config
//! directory unless `--config` / `VOLMAN_CONFIG` points elsewhere. A missing
//! file means defaults; command-line flags are applied on top by each
//! command.

pub mod schema;

pub use schema::Config;

use crate::error::{VolmanError, VolmanResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Reads and writes the settings file at one location
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the per-user settings file
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Manager for an explicit settings file
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `<config dir>/volman/config.toml`, or `./volman/config.toml` when the
    /// platform has no config directory
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("volman").join("config.toml")
    }

    /// Settings from the managed file; defaults when it does not exist
    pub async fn load(&self) -> VolmanResult<Config> {
        match fs::read_to_string(&self.config_path).await {
            Ok(content) => parse(&self.config_path, &content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.config_path.display());
                Ok(Config::default())
            }
            Err(e) => Err(read_error(&self.config_path, e)),
        }
    }

    /// Settings from `path`, which must exist
    pub async fn load_from_file(&self, path: &Path) -> VolmanResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| read_error(path, e))?;
        parse(path, &content)
    }

    /// Write `config` to the managed file, creating its directory
    pub async fn save(&self, config: &Config) -> VolmanResult<()> {
        let content = toml::to_string_pretty(config)?;

        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|source| VolmanError::ConfigDirCreate {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| VolmanError::io(format!("writing {}", self.config_path.display()), e))?;

        info!("Wrote config to {}", self.config_path.display());
        Ok(())
    }

    /// Location of the managed file
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(path: &Path, content: &str) -> VolmanResult<Config> {
    toml::from_str(content).map_err(|e| VolmanError::ConfigInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_error(path: &Path, source: std::io::Error) -> VolmanError {
    VolmanError::io(format!("reading {}", path.display()), source)
}
