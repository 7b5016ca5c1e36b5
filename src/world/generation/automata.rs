//! Cellular automata smoothing
//!
//! Each pass reads a snapshot of the previous state, so the update order of
//! cells never matters.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::world::{Grid, TileType};

/// How neighbours beyond the map edge are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutOfBoundsPolicy {
    /// Never counted as wall
    Floor,
    /// Always counted as wall
    #[default]
    Wall,
    /// Coin flip per missing neighbour
    Random,
    /// Counted as wall when the centre cell is a wall
    Mirror,
}

/// Smoothing thresholds and pass count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomataConfig {
    /// A wall with fewer wall neighbours than this opens up
    pub low_limit: u8,
    /// An open cell with at least this many wall neighbours fills in
    pub high_limit: u8,
    pub loops: u32,
    #[serde(default)]
    pub out_of_bounds: OutOfBoundsPolicy,
}

impl AutomataConfig {
    /// Thresholds used by the full generation pipeline
    pub fn full_pipeline() -> Self {
        Self {
            low_limit: 4,
            high_limit: 6,
            loops: 5,
            out_of_bounds: OutOfBoundsPolicy::Wall,
        }
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.low_limit > self.high_limit {
            return Err(GenError::InvalidThresholds {
                low: self.low_limit,
                high: self.high_limit,
            });
        }
        Ok(())
    }
}

impl Default for AutomataConfig {
    fn default() -> Self {
        Self {
            low_limit: 4,
            high_limit: 5,
            loops: 0,
            out_of_bounds: OutOfBoundsPolicy::Wall,
        }
    }
}

/// Count wall neighbours (8-directional)
pub fn count_adjacent_walls<R: Rng + ?Sized>(
    grid: &Grid,
    x: i32,
    y: i32,
    policy: OutOfBoundsPolicy,
    rng: &mut R,
) -> u8 {
    let centre_is_wall = grid.get(x, y).map_or(true, |t| t.is_wall());
    let mut count = 0;

    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let wall = match grid.get(x + dx, y + dy) {
                Some(tile) => tile.is_wall(),
                None => match policy {
                    OutOfBoundsPolicy::Floor => false,
                    OutOfBoundsPolicy::Wall => true,
                    OutOfBoundsPolicy::Random => rng.gen_bool(0.5),
                    OutOfBoundsPolicy::Mirror => centre_is_wall,
                },
            };
            if wall {
                count += 1;
            }
        }
    }

    count
}

/// Apply one smoothing pass and return the new grid
pub fn smooth<R: Rng + ?Sized>(grid: &Grid, config: &AutomataConfig, rng: &mut R) -> Grid {
    let mut next = Vec::with_capacity(grid.len());

    for (idx, tile) in grid.cells().iter().enumerate() {
        let (x, y) = grid.idx_to_xy(idx);
        let walls = count_adjacent_walls(grid, x, y, config.out_of_bounds, rng);

        let cell = match tile {
            TileType::Wall if walls < config.low_limit => TileType::Open,
            TileType::Open if walls >= config.high_limit => TileType::Wall,
            other => *other,
        };
        next.push(cell);
    }

    let mut out = grid.clone();
    out.replace_cells(next);
    out
}
