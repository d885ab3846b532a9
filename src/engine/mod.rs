//! Container engine client
//!
//! The volume manager only needs one engine capability: creating a named
//! volume. [`VolumeClient`] is that seam; [`CliVolumeClient`] drives the
//! `podman` or `docker` command line.

mod cli;

pub use cli::CliVolumeClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Volume label keys attached to volumes created by volman
pub mod labels {
    /// Marks a volume as managed by volman
    pub const MANAGED: &str = "io.volman.managed";
    /// Volume purpose (`cache` or `temporary`)
    pub const TYPE: &str = "io.volman.type";
    /// Job namespace the volume belongs to
    pub const JOB: &str = "io.volman.job";
    /// Resolved in-container destination
    pub const DESTINATION: &str = "io.volman.destination";
}

/// Errors reported by the container engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    #[error("Volume creation cancelled")]
    Cancelled,

    #[error("Volume creation timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Unexpected engine response: {0}")]
    Response(String),
}

impl EngineError {
    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }
}

// io::Error has no PartialEq; spawn failures compare by kind.
impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::CommandFailed { command: a, source: ea },
                Self::CommandFailed { command: b, source: eb },
            ) => a == b && ea.kind() == eb.kind(),
            (
                Self::CommandExecution { command: a, stderr: sa },
                Self::CommandExecution { command: b, stderr: sb },
            ) => a == b && sa == sb,
            (Self::Cancelled, Self::Cancelled) => true,
            (Self::TimedOut(a), Self::TimedOut(b)) => a == b,
            (Self::Response(a), Self::Response(b)) => a == b,
            _ => false,
        }
    }
}

/// Request to create a named volume
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeCreateRequest {
    /// Volume name
    pub name: String,
    /// Labels to attach
    pub labels: BTreeMap<String, String>,
}

impl VolumeCreateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Add a label
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Identity of a volume as reported by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    /// Volume name
    pub name: String,
    /// Storage driver
    #[serde(default)]
    pub driver: String,
    /// Host mountpoint, when the engine reports one
    #[serde(default)]
    pub mountpoint: Option<String>,
    /// Labels on the volume
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Engine capability consumed by the volume manager
#[async_trait]
pub trait VolumeClient: Send + Sync {
    /// Create a named volume.
    ///
    /// Must stop waiting once `cancel` fires. Implementations make a single
    /// attempt; a failure is final for the mount that asked for it.
    async fn create_volume(
        &self,
        cancel: &CancellationToken,
        request: VolumeCreateRequest,
    ) -> Result<VolumeInfo, EngineError>;

    /// Human-readable engine name for display
    fn engine_name(&self) -> &str;
}

/// Client that records requests without touching an engine
#[derive(Debug, Default)]
pub struct DryRunClient;

#[async_trait]
impl VolumeClient for DryRunClient {
    async fn create_volume(
        &self,
        cancel: &CancellationToken,
        request: VolumeCreateRequest,
    ) -> Result<VolumeInfo, EngineError> {
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        tracing::info!(volume = %request.name, "Would create volume");
        Ok(VolumeInfo {
            name: request.name,
            driver: "local".to_string(),
            mountpoint: None,
            labels: request.labels,
        })
    }

    fn engine_name(&self) -> &str {
        "dry-run"
    }
}
