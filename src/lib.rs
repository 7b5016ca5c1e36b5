//! Fogwood - procedural woods with fog of war
//!
//! Grows a tile map from noise and cellular automata, stitches its clearings
//! together with corridors, and reveals it tile by tile as explorers move.

pub mod data;
pub mod ecs;
pub mod error;
pub mod game;
pub mod world;

// Re-export commonly used types
pub use error::{ConfigError, GenError, SessionError};
pub use game::{MapCommand, Session, SessionConfig};
pub use world::generation::{GeneratorSettings, TerrainGenerator};
pub use world::{FogMap, FogRevealer, Grid, TileType};
