//! CLI command implementations

pub mod config;
pub mod hash;
pub mod plan;

pub use config::execute as config;
pub use hash::execute as hash;
pub use plan::execute as plan;
