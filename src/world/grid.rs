//! Grid data structure
//!
//! The flat 2D cell array every generation pass works on.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tile::TileType;
use crate::ecs::Position;
use crate::error::GenError;

/// A woods map: `width * height` cells stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<TileType>,
}

/// Serialized form, checked before it becomes a `Grid`
#[derive(Deserialize)]
struct RawGrid {
    width: i32,
    height: i32,
    cells: Vec<TileType>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GenError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let RawGrid { width, height, cells } = raw;
        if width < 0 || height < 0 || cells.len() != (width as usize) * (height as usize) {
            return Err(GenError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, cells })
    }
}

impl Grid {
    /// Create a grid with every cell open
    pub fn new(width: i32, height: i32) -> Result<Self, GenError> {
        Self::filled(width, height, TileType::Open)
    }

    /// Create a grid with every cell set to `tile`
    pub fn filled(width: i32, height: i32, tile: TileType) -> Result<Self, GenError> {
        if width < 0 || height < 0 {
            return Err(GenError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![tile; (width as usize) * (height as usize)],
        })
    }

    /// Build a grid from rows of `0`/`1` values. Rows must share one length.
    pub fn from_rows(rows: &[&[u8]]) -> Result<Self, GenError> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len()) as i32;
        if rows.iter().any(|r| r.len() as i32 != width) {
            return Err(GenError::InvalidDimensions { width, height });
        }
        let cells = rows
            .iter()
            .flat_map(|r| r.iter().map(|&v| TileType::from_u8(v)))
            .collect();
        Ok(Self { width, height, cells })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[TileType] {
        &self.cells
    }

    /// Replace the whole cell array. Length must match the dimensions.
    pub(crate) fn replace_cells(&mut self, cells: Vec<TileType>) {
        debug_assert_eq!(cells.len(), self.cells.len());
        self.cells = cells;
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Convert 1D index to 2D coordinates
    #[inline]
    pub fn idx_to_xy(&self, idx: usize) -> (i32, i32) {
        let idx = idx as i32;
        (idx % self.width, idx / self.width)
    }

    #[inline]
    pub fn idx_to_pos(&self, idx: usize) -> Position {
        let (x, y) = self.idx_to_xy(idx);
        Position::new(x, y)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Check if coordinates lie on the outer ring
    #[inline]
    pub fn is_border(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y)
            && (x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1)
    }

    /// Get cell at position
    pub fn get(&self, x: i32, y: i32) -> Option<TileType> {
        if self.in_bounds(x, y) {
            self.cells.get(self.xy_to_idx(x, y)).copied()
        } else {
            None
        }
    }

    /// Set cell at position. Out-of-range writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, tile: TileType) {
        if self.in_bounds(x, y) {
            let idx = self.xy_to_idx(x, y);
            self.cells[idx] = tile;
        }
    }

    /// Check if a position is walkable
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map_or(false, |t| t.is_walkable())
    }

    /// Force every cell on the outer ring to wall
    pub fn stamp_border(&mut self) {
        for idx in 0..self.cells.len() {
            let (x, y) = self.idx_to_xy(idx);
            if self.is_border(x, y) {
                self.cells[idx] = TileType::Wall;
            }
        }
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_walkable()).count()
    }

    /// Get all walkable positions (for spawning)
    pub fn walkable_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_walkable())
            .map(|(idx, _)| self.idx_to_pos(idx))
            .collect()
    }

    /// First open cell in scan order
    pub fn find_first_walkable(&self) -> Option<Position> {
        self.cells
            .iter()
            .position(|t| t.is_walkable())
            .map(|idx| self.idx_to_pos(idx))
    }

    /// Uniformly chosen open cell, `None` if the map has no clearing
    pub fn find_random_walkable<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        self.walkable_positions().choose(rng).copied()
    }

    /// Render as rows of glyphs
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for row in self.cells.chunks(self.width.max(1) as usize) {
            out.extend(row.iter().map(|t| t.glyph()));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_deserialize_checks_cell_count() {
        let bad = serde_json::from_str::<Grid>(r#"{"width":3,"height":3,"cells":[]}"#);
        assert!(bad.is_err());
        let negative = serde_json::from_str::<Grid>(r#"{"width":-1,"height":0,"cells":[]}"#);
        assert!(negative.is_err());

        let grid = Grid::from_rows(&[&[1, 0], &[0, 1]]).unwrap();
        let text = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&text).unwrap();
        assert_eq!(back, grid);
        assert_eq!(back.get(1, 1), Some(TileType::Wall));
    }

    #[test]
    fn test_index_roundtrip() {
        let grid = Grid::new(7, 4).unwrap();
        assert_eq!(grid.xy_to_idx(3, 2), 17);
        assert_eq!(grid.idx_to_xy(17), (3, 2));
        assert_eq!(grid.len(), 28);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(3, 1), None);
        grid.set(5, 5, TileType::Wall);
        assert_eq!(grid.open_count(), 9);
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        assert_eq!(
            Grid::new(-1, 4),
            Err(GenError::InvalidDimensions { width: -1, height: 4 })
        );
    }

    #[test]
    fn test_stamp_border() {
        let mut grid = Grid::new(5, 4).unwrap();
        grid.stamp_border();
        for y in 0..4 {
            for x in 0..5 {
                let expected = if grid.is_border(x, y) { TileType::Wall } else { TileType::Open };
                assert_eq!(grid.get(x, y), Some(expected));
            }
        }
        assert_eq!(grid.open_count(), 6);
    }

    #[test]
    fn test_walkable_search() {
        let grid = Grid::from_rows(&[&[1, 1, 1], &[1, 1, 0], &[0, 1, 1]]).unwrap();
        assert_eq!(grid.find_first_walkable(), Some(Position::new(2, 1)));

        let mut rng = StdRng::seed_from_u64(9);
        let pos = grid.find_random_walkable(&mut rng).unwrap();
        assert!(grid.is_walkable(pos.x, pos.y));

        let solid = Grid::filled(4, 4, TileType::Wall).unwrap();
        assert_eq!(solid.find_first_walkable(), None);
        assert_eq!(solid.find_random_walkable(&mut rng), None);
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::new(0, 10).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.to_ascii(), "");
    }
}
