//! Error types for Volman
//!
//! Library code below `volumes` and `engine` has its own error types;
//! everything the binary touches is folded into `VolmanError`.

use crate::engine::EngineError;
use crate::volumes::VolumeError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Volman operations
pub type VolmanResult<T> = Result<T, VolmanError>;

/// All errors surfaced by the volman CLI
#[derive(Error, Debug)]
pub enum VolmanError {
    // Volume errors
    #[error(transparent)]
    Volume(#[from] VolumeError),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl VolmanError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Volume(VolumeError::Engine(EngineError::CommandFailed { .. })) => {
                Some("Is the container engine installed? Set engine.program or use --dry-run")
            }
            Self::Volume(VolumeError::Engine(EngineError::TimedOut(_))) => {
                Some("Raise engine.timeout_secs or check the engine is responsive")
            }
            Self::Volume(e) => e.hint(),
            Self::ConfigInvalid { .. } => Some("Run: volman config init --force"),
            _ => None,
        }
    }
}

impl From<EngineError> for VolmanError {
    fn from(e: EngineError) -> Self {
        Self::Volume(VolumeError::Engine(e))
    }
}
