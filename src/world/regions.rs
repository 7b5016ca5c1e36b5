//! Connected region analysis
//!
//! Labels maximal 4-connected sets of open cells with an iterative flood
//! fill, so very large maps cannot overflow the call stack.

use super::Grid;
use crate::ecs::Position;

/// Neighbour offsets as `(dy, dx)`: right, down, left, up
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// A maximal set of mutually reachable open cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    cells: Vec<Position>,
}

impl Region {
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// Find every region, in the order their first cell appears in a row-major scan
pub fn identify_regions(grid: &Grid) -> Vec<Region> {
    let mut visited = vec![false; grid.len()];
    let mut regions = Vec::new();

    for start in 0..grid.len() {
        if visited[start] || !grid.cells()[start].is_walkable() {
            continue;
        }
        regions.push(flood_fill(grid, start, &mut visited));
    }

    regions
}

fn flood_fill(grid: &Grid, start: usize, visited: &mut [bool]) -> Region {
    let mut cells = Vec::new();
    let mut stack = vec![start];

    while let Some(idx) = stack.pop() {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        let pos = grid.idx_to_pos(idx);
        cells.push(pos);

        for (dy, dx) in DIRECTIONS {
            let (nx, ny) = (pos.x + dx, pos.y + dy);
            if grid.is_walkable(nx, ny) {
                let nidx = grid.xy_to_idx(nx, ny);
                if !visited[nidx] {
                    stack.push(nidx);
                }
            }
        }
    }

    Region { cells }
}

/// Region number for each cell, `None` for walls
pub fn region_labels(grid: &Grid) -> Vec<Option<usize>> {
    let mut labels = vec![None; grid.len()];
    for (label, region) in identify_regions(grid).iter().enumerate() {
        for pos in region.cells() {
            labels[grid.xy_to_idx(pos.x, pos.y)] = Some(label);
        }
    }
    labels
}

/// Mask of cells belonging to a region with fewer than `min_size` cells
pub fn cells_in_small_regions(grid: &Grid, min_size: usize) -> Vec<bool> {
    let mut mask = vec![false; grid.len()];
    for region in identify_regions(grid).iter().filter(|r| r.len() < min_size) {
        for pos in region.cells() {
            mask[grid.xy_to_idx(pos.x, pos.y)] = true;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileType;

    fn centre_block() -> Grid {
        let mut grid = Grid::filled(10, 10, TileType::Wall).unwrap();
        for y in 4..7 {
            for x in 4..7 {
                grid.set(x, y, TileType::Open);
            }
        }
        grid
    }

    #[test]
    fn test_single_centre_block() {
        let mut grid = centre_block();
        grid.stamp_border();

        let regions = identify_regions(&grid);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 9);
        assert!(regions[0].contains(Position::new(5, 5)));
    }

    #[test]
    fn test_regions_partition_open_cells() {
        let grid = Grid::from_rows(&[
            &[0, 0, 1, 0, 0],
            &[1, 0, 1, 1, 0],
            &[1, 1, 1, 0, 0],
            &[0, 1, 0, 1, 1],
            &[0, 1, 0, 0, 1],
        ])
        .unwrap();

        let regions = identify_regions(&grid);
        let mut seen = vec![0u32; grid.len()];
        for region in &regions {
            for pos in region.cells() {
                assert!(grid.is_walkable(pos.x, pos.y));
                seen[grid.xy_to_idx(pos.x, pos.y)] += 1;
            }
        }
        for (idx, tile) in grid.cells().iter().enumerate() {
            let expected = if tile.is_walkable() { 1 } else { 0 };
            assert_eq!(seen[idx], expected, "cell {} miscounted", idx);
        }
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn test_discovery_order_is_scan_order() {
        let grid = Grid::from_rows(&[&[1, 1, 0], &[0, 1, 1], &[1, 1, 1]]).unwrap();
        let regions = identify_regions(&grid);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].cells(), &[Position::new(2, 0)]);
        assert_eq!(regions[1].cells(), &[Position::new(0, 1)]);
        assert_eq!(identify_regions(&grid), regions);
    }

    #[test]
    fn test_diagonal_cells_are_separate() {
        let grid = Grid::from_rows(&[&[0, 1], &[1, 0]]).unwrap();
        assert_eq!(identify_regions(&grid).len(), 2);
    }

    #[test]
    fn test_large_open_grid_does_not_overflow() {
        let grid = Grid::new(400, 400).unwrap();
        let regions = identify_regions(&grid);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 160_000);
    }

    #[test]
    fn test_labels_and_small_mask() {
        let grid = Grid::from_rows(&[&[0, 1, 0, 0], &[1, 1, 0, 0]]).unwrap();
        let labels = region_labels(&grid);
        assert_eq!(labels[0], Some(0));
        assert_eq!(labels[1], None);
        assert_eq!(labels[2], Some(1));
        assert_eq!(labels[7], Some(1));

        let small = cells_in_small_regions(&grid, 2);
        assert_eq!(small, vec![true, false, false, false, false, false, false, false]);
    }
}
