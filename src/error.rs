//! Error types
//!
//! Configuration problems are reported before any grid is touched.
//! Per-cell anomalies never surface here; they are skipped and logged.

use thiserror::Error;

/// Errors raised while configuring or running the terrain generator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    /// Negative width or height
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// Noise fill requested without a noise provider
    #[error("no noise provider configured")]
    MissingNoiseProvider,

    /// Smoothing thresholds in the wrong order
    #[error("invalid automata thresholds: low limit {low} is above high limit {high}")]
    InvalidThresholds { low: u8, high: u8 },

    /// Noise parameters outside their documented ranges
    #[error("invalid noise configuration: {0}")]
    InvalidNoise(String),
}

/// Errors from loading or exporting configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Errors from the exploration session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Generation(#[from] GenError),

    /// The generated map has no open cell to place an explorer on
    #[error("no walkable tile available")]
    NoWalkableTile,

    /// A referenced explorer no longer exists in the world
    #[error("unknown entity {0:?}")]
    UnknownEntity(hecs::Entity),
}
