//! Configuration schema for Volman
//!
//! Configuration is stored at `~/.config/volman/config.toml`

use crate::volumes::{ManagerConfig, PathStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Volume planning settings
    pub volumes: VolumesConfig,

    /// Container engine settings
    pub engine: EngineConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Volume planning configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumesConfig {
    /// Base for relative destinations
    pub base_path: String,

    /// Host directory for caches (empty = engine volumes)
    pub cache_dir: String,

    /// Job namespace for cache names
    pub unique_name: String,

    /// Reject source-less (cache) mounts
    pub disable_cache: bool,

    /// Path syntax inside the job container
    pub platform: PathStyle,
}

impl VolumesConfig {
    /// Settings for a volume manager
    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            base_path: self.base_path.clone(),
            cache_dir: self.cache_dir.clone(),
            unique_name: self.unique_name.clone(),
            disable_cache: self.disable_cache,
        }
    }
}

/// Container engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine CLI to invoke ("podman" or "docker")
    pub program: String,

    /// Seconds to wait for a volume to be created (0 = no limit)
    pub timeout_secs: u64,
}

impl EngineConfig {
    /// Timeout for engine calls, if any
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "podman".to_string(),
            timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[volumes]"));
        assert!(toml.contains("disable_cache = false"));
        assert!(toml.contains("platform = \"unix\""));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.engine.program, "podman");
        assert_eq!(config.volumes.manager_config(), ManagerConfig::default());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [volumes]
            cache_dir = "/cache"
            unique_name = "runner-abc-project-1"
            platform = "windows"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let manager = config.volumes.manager_config();
        assert_eq!(manager.cache_dir, "/cache");
        assert_eq!(manager.unique_name, "runner-abc-project-1");
        assert!(!manager.disable_cache);
        assert_eq!(config.volumes.platform, PathStyle::Windows);
        assert_eq!(config.engine.timeout_secs, 60); // default preserved
    }

    #[test]
    fn engine_timeout() {
        let mut engine = EngineConfig::default();
        assert_eq!(engine.timeout(), Some(Duration::from_secs(60)));
        engine.timeout_secs = 0;
        assert_eq!(engine.timeout(), None);
    }
}
