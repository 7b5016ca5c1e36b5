//! World module
//!
//! Contains the map grid, region analysis, fog of war and procedural generation.

pub mod bounds;
pub mod fog;
pub mod generation;
pub mod grid;
pub mod regions;
pub mod tile;

pub use bounds::Rect;
pub use fog::{ExplorerProbe, FogMap, FogRevealer, FogTile, TileSnapshot};
pub use grid::Grid;
pub use regions::{identify_regions, Region};
pub use tile::TileType;
