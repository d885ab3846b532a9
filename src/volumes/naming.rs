//! Deterministic names for cache storage
//!
//! Cache names are derived from the resolved destination only, so the same
//! job identity finds the same cache on every run. Isolation between job
//! identities comes from the literal `unique_name` prefix or directory.

use crate::volumes::path::PathResolver;
use md5::{Digest, Md5};

/// Infix between the job namespace and the path hash in volume names
pub const CACHE_INFIX: &str = "-cache-";

/// Hash a resolved destination into 32 lowercase hex characters
pub fn hash_path(path: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(path.as_bytes());
    hex::encode(hasher.finalize())
}

/// Name of the engine volume backing a cache at `path`
pub fn cache_volume_name(unique_name: &str, path: &str) -> String {
    format!("{}{}{}", unique_name, CACHE_INFIX, hash_path(path))
}

/// Host directory backing a cache at `path`: `cache_dir/unique_name/<hash>`
pub fn host_cache_path(
    resolver: &dyn PathResolver,
    cache_dir: &str,
    unique_name: &str,
    path: &str,
) -> String {
    let job_dir = resolver.join(cache_dir, unique_name);
    resolver.join(&job_dir, &hash_path(path))
}
