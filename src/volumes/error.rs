//! Failures of a single volume creation call

use crate::engine::EngineError;
use crate::volumes::parser::ParseError;
use thiserror::Error;

/// Why a mount could not be added to the bind list
#[derive(Error, Debug)]
pub enum VolumeError {
    #[error("parse volume {spec:?}: {source}")]
    Parse {
        spec: String,
        #[source]
        source: ParseError,
    },

    #[error("destination is the root path")]
    RootPath,

    #[error("volume for container path {destination:?} is already defined")]
    AlreadyDefined { destination: String },

    #[error("cache volumes feature disabled")]
    CacheDisabled,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl VolumeError {
    /// Create a duplicate destination error
    pub fn already_defined(destination: impl Into<String>) -> Self {
        Self::AlreadyDefined {
            destination: destination.into(),
        }
    }

    /// The engine failure this error carries, unchanged
    pub fn engine_cause(&self) -> Option<&EngineError> {
        match self {
            Self::Engine(e) => Some(e),
            _ => None,
        }
    }

    /// The parser failure this error carries, unchanged
    pub fn parse_cause(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RootPath => Some("Mount a subdirectory instead of the container root"),
            Self::AlreadyDefined { .. } => Some("Remove the duplicate mount for this destination"),
            Self::CacheDisabled => {
                Some("Give the mount a host source or enable cache volumes")
            }
            _ => None,
        }
    }
}

// Matching is by kind and wrapped cause, never by identity.
impl PartialEq for VolumeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Parse { spec: a, source: ea },
                Self::Parse { spec: b, source: eb },
            ) => a == b && ea == eb,
            (Self::RootPath, Self::RootPath) => true,
            (
                Self::AlreadyDefined { destination: a },
                Self::AlreadyDefined { destination: b },
            ) => a == b,
            (Self::CacheDisabled, Self::CacheDisabled) => true,
            (Self::Engine(a), Self::Engine(b)) => a == b,
            _ => false,
        }
    }
}
