//! Volman - mount and cache volume planning for job containers
//!
//! Turns the mounts a job declares into an ordered, collision-free bind
//! list, creating deterministically named cache volumes on the container
//! engine where needed.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod volumes;

pub use error::{VolmanError, VolmanResult};
