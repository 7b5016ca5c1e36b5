//! Tile definitions
//!
//! The two cell states of a woods map and their properties.

use serde::{Deserialize, Serialize};

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    /// Traversable clearing
    #[default]
    Open,
    /// Blocking tree line
    Wall,
}

impl TileType {
    pub fn is_walkable(&self) -> bool {
        matches!(self, TileType::Open)
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, TileType::Wall)
    }

    /// Numeric encoding used by map dumps (0 = open, 1 = wall)
    pub fn as_u8(&self) -> u8 {
        match self {
            TileType::Open => 0,
            TileType::Wall => 1,
        }
    }

    /// Decode a cell value; anything non-zero is a wall
    pub fn from_u8(value: u8) -> Self {
        if value == 0 {
            TileType::Open
        } else {
            TileType::Wall
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            TileType::Open => '.',
            TileType::Wall => '#',
        }
    }
}
