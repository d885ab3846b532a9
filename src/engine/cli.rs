//! Engine client backed by the podman/docker command line
//!
//! Both CLIs accept `volume create --label k=v <name>` and report volumes
//! with `volume inspect <name>` as a JSON array.

use crate::engine::{EngineError, VolumeClient, VolumeCreateRequest, VolumeInfo};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Volume client that shells out to a container engine CLI
#[derive(Debug, Clone)]
pub struct CliVolumeClient {
    program: String,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectedVolume {
    name: String,
    #[serde(default)]
    driver: String,
    #[serde(default)]
    mountpoint: Option<String>,
    #[serde(default)]
    labels: Option<BTreeMap<String, String>>,
}

impl CliVolumeClient {
    /// Create a client for `program` (e.g. `podman`)
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Bound each volume creation, inspect included, by `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the engine once, racing it against cancellation and `deadline`
    async fn exec(
        &self,
        cancel: &CancellationToken,
        args: &[String],
        deadline: Option<Instant>,
    ) -> Result<Output, EngineError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("Executing: {}", command);

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let run = async {
            let result = match deadline {
                Some(at) => match tokio::time::timeout_at(at, cmd.output()).await {
                    Ok(result) => result,
                    Err(_) => {
                        return Err(EngineError::TimedOut(self.timeout.unwrap_or_default()))
                    }
                },
                None => cmd.output().await,
            };
            result.map_err(|e| EngineError::command_failed(command.clone(), e))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(EngineError::Cancelled),
            result = run => result,
        }
    }

    /// Look up a volume that already exists.
    ///
    /// Never fails: the volume is there, so anything the engine does wrong
    /// here degrades to the request data.
    async fn inspect(
        &self,
        cancel: &CancellationToken,
        request: VolumeCreateRequest,
        deadline: Option<Instant>,
    ) -> VolumeInfo {
        let args = vec![
            "volume".to_string(),
            "inspect".to_string(),
            request.name.clone(),
        ];

        match self.exec(cancel, &args, deadline).await {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                match parse_inspect(&stdout) {
                    Ok(info) => return info,
                    Err(e) => debug!("Ignoring inspect output for {}: {}", request.name, e),
                }
            }
            Ok(output) => debug!(
                "Inspect of {} failed: {}",
                request.name,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => debug!("Inspect of {} failed: {}", request.name, e),
        }

        VolumeInfo {
            name: request.name,
            driver: String::new(),
            mountpoint: None,
            labels: request.labels,
        }
    }
}

impl Default for CliVolumeClient {
    fn default() -> Self {
        Self::new("podman")
    }
}

/// Parse `volume inspect` output (a JSON array with one element)
fn parse_inspect(stdout: &str) -> Result<VolumeInfo, EngineError> {
    let volumes: Vec<InspectedVolume> =
        serde_json::from_str(stdout).map_err(|e| EngineError::Response(e.to_string()))?;

    let vol = volumes
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::Response("empty inspect output".to_string()))?;

    Ok(VolumeInfo {
        name: vol.name,
        driver: vol.driver,
        mountpoint: vol.mountpoint.filter(|m| !m.is_empty()),
        labels: vol.labels.unwrap_or_default(),
    })
}

#[async_trait]
impl VolumeClient for CliVolumeClient {
    async fn create_volume(
        &self,
        cancel: &CancellationToken,
        request: VolumeCreateRequest,
    ) -> Result<VolumeInfo, EngineError> {
        debug!("Creating volume: {}", request.name);

        let mut args = vec!["volume".to_string(), "create".to_string()];
        for (key, value) in &request.labels {
            args.push("--label".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push(request.name.clone());

        // One deadline covers the create and the inspect that follows it
        let deadline = self.timeout.map(|limit| Instant::now() + limit);

        let output = self.exec(cancel, &args, deadline).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::command_exec(
                format!("{} volume create", self.program),
                stderr.trim(),
            ));
        }

        debug!("Volume created: {}", request.name);
        Ok(self.inspect(cancel, request, deadline).await)
    }

    fn engine_name(&self) -> &str {
        &self.program
    }
}
