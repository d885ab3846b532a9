//! Mount planning for job containers
//!
//! Resolves user-declared mounts and internally required scratch mounts
//! into bind entries for container creation. Source-less mounts become
//! caches that persist across runs of the same job identity.
//!
//! # Cache strategies
//!
//! | Setting | Backing storage | Bind source |
//! |---------|-----------------|-------------|
//! | `disable_cache` | none, request rejected | - |
//! | `cache_dir` set | host directory | `cache_dir/unique_name/<hash>` |
//! | otherwise | engine volume | `unique_name-cache-<hash>` |

pub mod error;
pub mod manager;
pub mod naming;
pub mod parser;
pub mod path;

pub use error::VolumeError;
pub use manager::{DefaultManager, ManagerConfig, VolumeManager};
pub use naming::{cache_volume_name, hash_path, host_cache_path};
pub use parser::{create_parser, LinuxParser, MountSpec, ParseError, VolumeParser, WindowsParser};
pub use path::{resolver_for, PathResolver, PathStyle, UnixPath, WindowsPath};
