//! Corridor carving between regions
//!
//! Corridors are two cells wide so diagonal-only gaps never leave a
//! single-width passage that dead-ends.

use crate::ecs::Position;
use crate::world::regions::Region;
use crate::world::{Grid, TileType};

/// Manhattan-nearest pair of cells, first minimum in scan order wins.
/// Returns `None` when either region is empty.
pub fn find_closest_cells(a: &Region, b: &Region) -> Option<(Position, Position)> {
    let mut best: Option<(i32, Position, Position)> = None;

    for &from in a.cells() {
        for &to in b.cells() {
            let dist = from.distance(&to);
            if best.map_or(true, |(min, _, _)| dist < min) {
                best = Some((dist, from, to));
            }
        }
    }

    best.map(|(_, from, to)| (from, to))
}

/// Open the primary cell plus its swath partner.
///
/// Moving horizontally the partner is the cell below, moving vertically it is
/// the cell to the right. Partners on the outer ring stay wall.
fn clear_wide(grid: &mut Grid, x: i32, y: i32, horizontal: bool) {
    grid.set(x, y, TileType::Open);

    let (px, py) = if horizontal { (x, y + 1) } else { (x + 1, y) };
    if grid.in_bounds(px, py) && !grid.is_border(px, py) {
        grid.set(px, py, TileType::Open);
    }
}

/// Carve an L-shaped corridor: along the row of `start`, then down the column of `end`
pub fn carve_path(grid: &mut Grid, start: Position, end: Position) {
    let (mut x, mut y) = (start.x, start.y);

    while x != end.x {
        clear_wide(grid, x, y, true);
        x += if x < end.x { 1 } else { -1 };
    }

    while y != end.y {
        clear_wide(grid, x, y, false);
        y += if y < end.y { 1 } else { -1 };
    }

    clear_wide(grid, end.x, end.y, false);
}

/// Join two regions with a corridor between their closest cells
pub fn connect(a: &Region, b: &Region, grid: &mut Grid) {
    if let Some((start, end)) = find_closest_cells(a, b) {
        log::trace!(
            "Carving corridor ({}, {}) -> ({}, {}), length {}",
            start.x,
            start.y,
            end.x,
            end.y,
            start.distance(&end)
        );
        carve_path(grid, start, end);
    }
}

/// Chain regions in discovery order: `regions[i]` to `regions[i + 1]`.
///
/// Needs only `n - 1` corridors; every region ends up reachable through the
/// chain, though not always by the shortest route.
pub fn connect_sequential(regions: &[Region], grid: &mut Grid) {
    for pair in regions.windows(2) {
        connect(&pair[0], &pair[1], grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::regions::identify_regions;

    fn corners() -> Grid {
        let mut grid = Grid::filled(10, 10, TileType::Wall).unwrap();
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2), (7, 7), (8, 7), (7, 8), (8, 8)] {
            grid.set(x, y, TileType::Open);
        }
        grid
    }

    fn reachable(grid: &Grid, from: Position, to: Position) -> bool {
        identify_regions(grid)
            .iter()
            .any(|r| r.contains(from) && r.contains(to))
    }

    #[test]
    fn test_closest_pair() {
        let grid = corners();
        let regions = identify_regions(&grid);
        let (a, b) = find_closest_cells(&regions[0], &regions[1]).unwrap();
        assert_eq!(a, Position::new(2, 2));
        assert_eq!(b, Position::new(7, 7));
    }

    #[test]
    fn test_connect_opposite_corners() {
        let mut grid = corners();
        let regions = identify_regions(&grid);
        assert_eq!(regions.len(), 2);

        connect(&regions[0], &regions[1], &mut grid);

        assert_eq!(identify_regions(&grid).len(), 1);
        assert!(reachable(&grid, Position::new(1, 1), Position::new(8, 8)));
    }

    #[test]
    fn test_connect_only_opens_path_cells() {
        let before = corners();
        let mut grid = before.clone();
        let regions = identify_regions(&grid);
        connect(&regions[0], &regions[1], &mut grid);

        for (idx, (old, new)) in before.cells().iter().zip(grid.cells()).enumerate() {
            if old.is_walkable() {
                assert!(new.is_walkable(), "open cell {} was closed", idx);
            }
            if old != new {
                let (x, y) = grid.idx_to_xy(idx);
                // Row 2 (plus swath row 3) from x=2..7, then column 7 (plus column 8)
                let on_row = (y == 2 || y == 3) && (2..=7).contains(&x);
                let on_col = (x == 7 || x == 8) && (2..=7).contains(&y);
                assert!(on_row || on_col, "unexpected change at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_swath_never_touches_border() {
        let mut grid = Grid::filled(6, 4, TileType::Wall).unwrap();
        carve_path(&mut grid, Position::new(1, 2), Position::new(4, 2));
        for x in 0..6 {
            assert_eq!(grid.get(x, 3), Some(TileType::Wall));
        }
        for x in 1..=4 {
            assert_eq!(grid.get(x, 2), Some(TileType::Open));
        }
    }

    #[test]
    fn test_sequential_chain_joins_all() {
        let mut grid = Grid::from_rows(&[
            &[1, 1, 1, 1, 1, 1, 1, 1, 1],
            &[1, 0, 1, 1, 0, 1, 1, 0, 1],
            &[1, 1, 1, 1, 1, 1, 1, 1, 1],
            &[1, 1, 1, 1, 1, 1, 1, 1, 1],
            &[1, 0, 1, 1, 1, 1, 1, 0, 1],
            &[1, 1, 1, 1, 1, 1, 1, 1, 1],
        ])
        .unwrap();
        let regions = identify_regions(&grid);
        assert_eq!(regions.len(), 5);

        connect_sequential(&regions, &mut grid);
        assert_eq!(identify_regions(&grid).len(), 1);
    }

    #[test]
    fn test_empty_region_is_ignored() {
        let grid = corners();
        let regions = identify_regions(&grid);
        let empty = Region::default();
        assert_eq!(find_closest_cells(&regions[0], &empty), None);
    }
}
