//! Fog of war
//!
//! Tiles start fogged and are revealed for good once an active explorer's
//! bounds overlap them. Every reveal is recorded in a dirty list the
//! renderer drains between ticks.

use serde::{Deserialize, Serialize};

use super::bounds::Rect;
use super::Grid;
use crate::ecs::Position;

/// Default number of scheduler ticks between fog scans
pub const DEFAULT_REVEAL_INTERVAL: u32 = 5;

/// Fog state of one map tile
#[derive(Debug, Clone, PartialEq)]
pub struct FogTile {
    pub index: usize,
    pub position: Position,
    /// World-space footprint; `None` if the tile was never laid out
    pub bounds: Option<Rect>,
    pub open: bool,
    fogged: bool,
}

impl FogTile {
    pub fn new(index: usize, position: Position, bounds: Option<Rect>, open: bool) -> Self {
        Self {
            index,
            position,
            bounds,
            open,
            fogged: true,
        }
    }

    pub fn is_fogged(&self) -> bool {
        self.fogged
    }

    /// Bounds usable for overlap tests
    fn valid_bounds(&self) -> Option<Rect> {
        self.bounds.filter(Rect::is_valid)
    }
}

/// What the renderer receives for each tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub x: i32,
    pub y: i32,
    pub open: bool,
    pub bounds: Option<Rect>,
    pub fog: bool,
}

/// A moving exploration footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorerProbe {
    pub bounds: Rect,
    pub active: bool,
}

/// Fog tiles for a whole map plus the pending dirty list
#[derive(Debug, Clone)]
pub struct FogMap {
    width: i32,
    height: i32,
    tiles: Vec<FogTile>,
    dirty: Vec<usize>,
}

impl FogMap {
    /// Lay tiles out on a regular `tile_width` x `tile_height` lattice, all fogged
    pub fn from_grid(grid: &Grid, tile_width: f32, tile_height: f32) -> Self {
        let tiles = grid
            .cells()
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let position = grid.idx_to_pos(idx);
                let left = position.x as f32 * tile_width;
                let top = position.y as f32 * tile_height;
                let bounds = Rect::new(left, top, left + tile_width, top + tile_height);
                FogTile::new(idx, position, Some(bounds), cell.is_walkable())
            })
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            tiles,
            dirty: Vec::new(),
        }
    }

    /// Build from externally laid out tiles. Indices are reassigned to match order.
    pub fn from_tiles(width: i32, height: i32, mut tiles: Vec<FogTile>) -> Self {
        for (idx, tile) in tiles.iter_mut().enumerate() {
            tile.index = idx;
        }
        Self {
            width,
            height,
            tiles,
            dirty: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tiles(&self) -> &[FogTile] {
        &self.tiles
    }

    pub fn tile(&self, idx: usize) -> Option<&FogTile> {
        self.tiles.get(idx)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<&FogTile> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get((y * self.width + x) as usize)
    }

    /// Clear the fog on a tile and record it as dirty in one step.
    /// Returns false if the tile was already revealed or does not exist.
    pub fn reveal(&mut self, idx: usize) -> bool {
        let Some(tile) = self.tiles.get_mut(idx) else {
            return false;
        };
        if !tile.fogged {
            return false;
        }
        tile.fogged = false;
        debug_assert!(!self.dirty.contains(&idx), "tile {} dirty while fogged", idx);
        self.dirty.push(idx);
        true
    }

    /// Pick up cell changes after the map was edited in place.
    ///
    /// Fog state is kept. Revealed tiles whose cell changed are queued as
    /// dirty so the renderer redraws them. Returns the number of changed tiles.
    pub fn sync_cells(&mut self, grid: &Grid) -> usize {
        if grid.width() != self.width || grid.height() != self.height {
            log::warn!(
                "Fog map is {}x{} but grid is {}x{}; cells not synced",
                self.width,
                self.height,
                grid.width(),
                grid.height()
            );
            return 0;
        }

        let mut changed = 0;
        for (tile, cell) in self.tiles.iter_mut().zip(grid.cells()) {
            let open = cell.is_walkable();
            if tile.open == open {
                continue;
            }
            tile.open = open;
            changed += 1;
            if !tile.fogged && !self.dirty.contains(&tile.index) {
                self.dirty.push(tile.index);
            }
        }
        changed
    }

    /// Tiles revealed since the last drain, in reveal order
    pub fn dirty_tiles(&self) -> &[usize] {
        &self.dirty
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Hand the dirty list to the renderer and start a new one
    pub fn take_dirty(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.dirty)
    }

    pub fn fogged_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.fogged).count()
    }

    pub fn revealed_count(&self) -> usize {
        self.tiles.len() - self.fogged_count()
    }

    pub fn snapshot(&self) -> Vec<TileSnapshot> {
        self.tiles
            .iter()
            .map(|t| TileSnapshot {
                x: t.position.x,
                y: t.position.y,
                open: t.open,
                bounds: t.bounds,
                fog: t.fogged,
            })
            .collect()
    }
}

/// Throttled overlap scan between explorers and fogged tiles.
///
/// The tick index is supplied by the caller, so independent revealers never
/// share a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FogRevealer {
    interval: u32,
}

impl FogRevealer {
    /// Scan every `interval` ticks; 0 and 1 both mean every tick
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn should_scan(&self, tick: u64) -> bool {
        tick % self.interval as u64 == 0
    }

    /// Run the scan if `tick` falls on the interval. Returns tiles newly revealed.
    pub fn update(&self, tick: u64, map: &mut FogMap, probes: &[ExplorerProbe]) -> usize {
        if !self.should_scan(tick) {
            return 0;
        }
        let revealed = self.scan(map, probes);
        if revealed > 0 {
            log::debug!("Tick {}: revealed {} tiles", tick, revealed);
        }
        revealed
    }

    /// Unthrottled scan
    pub fn scan(&self, map: &mut FogMap, probes: &[ExplorerProbe]) -> usize {
        let mut revealed = 0;

        for probe in probes {
            if !probe.active {
                continue;
            }
            if !probe.bounds.is_valid() {
                log::trace!("Skipping explorer with malformed bounds {:?}", probe.bounds);
                continue;
            }

            for idx in 0..map.tiles.len() {
                let tile = &map.tiles[idx];
                if !tile.fogged {
                    continue;
                }
                let Some(bounds) = tile.valid_bounds() else {
                    log::trace!("Skipping tile {} without usable bounds", idx);
                    continue;
                };
                if probe.bounds.overlaps(&bounds) && map.reveal(idx) {
                    revealed += 1;
                }
            }
        }

        revealed
    }
}

impl Default for FogRevealer {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_INTERVAL)
    }
}
