//! Configuration data
//!
//! Generator and session settings live in external RON files so maps can
//! be tuned without rebuilding.

pub mod loader;

pub use loader::{export_default_config, FogwoodConfig, DEFAULT_CONFIG_PATH};
