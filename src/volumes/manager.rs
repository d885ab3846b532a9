//! Volume manager
//!
//! Turns the mounts declared for one job into an ordered, collision-free
//! list of bind entries (`source:destination[:mode]`). Source-less mounts
//! are caches, backed either by a host directory or by an engine volume.
//!
//! A manager lives for one job's setup phase. Calls are sequential: the
//! manager takes `&mut self` and holds no lock.

use crate::engine::{labels, VolumeClient, VolumeCreateRequest};
use crate::volumes::error::VolumeError;
use crate::volumes::naming;
use crate::volumes::parser::VolumeParser;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Per-job volume settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Base for relative destinations
    pub base_path: String,
    /// Host directory for caches; empty selects engine volumes
    pub cache_dir: String,
    /// Namespace isolating this job's caches from other jobs
    pub unique_name: String,
    /// Reject every cache request
    pub disable_cache: bool,
}

/// Why an engine volume is being created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VolumeKind {
    Cache,
    Temporary,
}

impl VolumeKind {
    fn as_label(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Temporary => "temporary",
        }
    }
}

/// Builds the bind list for one job container
#[async_trait]
pub trait VolumeManager: Send {
    /// Add a user-declared mount. An empty spec is a no-op.
    async fn create(&mut self, cancel: &CancellationToken, volume: &str) -> Result<(), VolumeError>;

    /// Add an engine-volume mount the job needs regardless of cache settings
    async fn create_temporary(
        &mut self,
        cancel: &CancellationToken,
        destination: &str,
    ) -> Result<(), VolumeError>;

    /// Bind entries of every successful call, in call order
    fn binds(&self) -> Vec<String>;
}

/// Volume manager backed by a parser and an engine client
pub struct DefaultManager {
    client: Arc<dyn VolumeClient>,
    parser: Box<dyn VolumeParser>,
    config: ManagerConfig,
    managed: HashSet<String>,
    bindings: Vec<String>,
}

impl DefaultManager {
    /// Create a manager for one job
    pub fn new(
        client: Arc<dyn VolumeClient>,
        parser: Box<dyn VolumeParser>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            client,
            parser,
            config,
            managed: HashSet::new(),
            bindings: Vec::new(),
        }
    }

    /// The configuration this manager was built with
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Root guard, then base-path resolution of a relative destination
    fn resolve_destination(&self, destination: &str) -> Result<String, VolumeError> {
        let path = self.parser.path();

        if path.is_root(destination) {
            return Err(VolumeError::RootPath);
        }
        if path.is_abs(destination) || self.config.base_path.is_empty() {
            return Ok(destination.to_string());
        }
        Ok(path.join(&self.config.base_path, destination))
    }

    fn ensure_unmanaged(&self, destination: &str) -> Result<(), VolumeError> {
        if self.managed.contains(destination) {
            return Err(VolumeError::already_defined(destination));
        }
        Ok(())
    }

    /// Record a finished bind; the only place state changes
    fn commit(&mut self, destination: String, bind: String) {
        debug!("Adding volume binding: {}", bind);
        self.bindings.push(bind);
        self.managed.insert(destination);
    }

    /// Pick the backing source of a cache mount
    async fn cache_source(
        &self,
        cancel: &CancellationToken,
        destination: &str,
    ) -> Result<String, VolumeError> {
        if self.config.disable_cache {
            debug!("Cache containers feature is disabled");
            return Err(VolumeError::CacheDisabled);
        }

        if !self.config.cache_dir.is_empty() {
            let host_path = naming::host_cache_path(
                self.parser.path(),
                &self.config.cache_dir,
                &self.config.unique_name,
                destination,
            );
            debug!(destination, source = %host_path, "Using host-based cache");
            return Ok(host_path);
        }

        self.create_engine_volume(cancel, VolumeKind::Cache, destination)
            .await
    }

    /// Create the deterministically named engine volume for `destination`
    async fn create_engine_volume(
        &self,
        cancel: &CancellationToken,
        kind: VolumeKind,
        destination: &str,
    ) -> Result<String, VolumeError> {
        let name = naming::cache_volume_name(&self.config.unique_name, destination);

        let mut request = VolumeCreateRequest::new(name.clone())
            .label(labels::MANAGED, "true")
            .label(labels::TYPE, kind.as_label())
            .label(labels::DESTINATION, destination);
        if !self.config.unique_name.is_empty() {
            request = request.label(labels::JOB, self.config.unique_name.clone());
        }

        debug!(
            volume = %name,
            engine = self.client.engine_name(),
            "Creating {} volume",
            kind.as_label()
        );
        let info = self.client.create_volume(cancel, request).await?;
        debug!("Volume {} ready (driver: {})", info.name, info.driver);

        Ok(name)
    }
}

#[async_trait]
impl VolumeManager for DefaultManager {
    async fn create(&mut self, cancel: &CancellationToken, volume: &str) -> Result<(), VolumeError> {
        if volume.is_empty() {
            return Ok(());
        }

        let mut spec = self
            .parser
            .parse_volume(volume)
            .map_err(|source| VolumeError::Parse {
                spec: volume.to_string(),
                source,
            })?;

        spec.destination = self.resolve_destination(&spec.destination)?;
        self.ensure_unmanaged(&spec.destination)?;

        let source = match &spec.source {
            Some(source) => source.clone(),
            None => self.cache_source(cancel, &spec.destination).await?,
        };

        let bind = spec.bind_string(&source);
        self.commit(spec.destination, bind);
        Ok(())
    }

    async fn create_temporary(
        &mut self,
        cancel: &CancellationToken,
        destination: &str,
    ) -> Result<(), VolumeError> {
        if destination.is_empty() {
            return Ok(());
        }

        let destination = self.resolve_destination(destination)?;
        self.ensure_unmanaged(&destination)?;

        let name = self
            .create_engine_volume(cancel, VolumeKind::Temporary, &destination)
            .await?;

        let bind = format!("{}:{}", name, destination);
        self.commit(destination, bind);
        Ok(())
    }

    fn binds(&self) -> Vec<String> {
        self.bindings.clone()
    }
}
