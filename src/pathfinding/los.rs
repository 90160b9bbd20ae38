//! Line-of-sight check between grid cells.

use crate::core::GridCoord;
use crate::NavGrid;

/// Check line of sight between two cells.
///
/// Walks the integer line from `from` to `to` (Bresenham) and rejects the
/// sightline the moment it crosses a non-walkable cell. Both endpoints are
/// checked.
pub fn line_of_sight<G: NavGrid + ?Sized>(grid: &G, from: GridCoord, to: GridCoord) -> bool {
    let mut x0 = from.x;
    let mut y0 = from.y;
    let x1 = to.x;
    let y1 = to.y;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        // Check current cell
        if !grid.is_walkable(GridCoord::new(x0, y0)) {
            return false;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;

    #[test]
    fn test_clear_sightline() {
        let grid = TileGrid::new(20, 20, 32.0);
        assert!(line_of_sight(
            &grid,
            GridCoord::new(0, 0),
            GridCoord::new(19, 7)
        ));
    }

    #[test]
    fn test_wall_blocks_sightline() {
        let grid = TileGrid::from_ascii(
            ".....#....\n\
             .....#....\n\
             .....#....\n\
             .....#....",
            32.0,
        );

        assert!(!line_of_sight(
            &grid,
            GridCoord::new(0, 1),
            GridCoord::new(9, 1)
        ));
        // Along the wall, not through it
        assert!(line_of_sight(
            &grid,
            GridCoord::new(0, 0),
            GridCoord::new(4, 3)
        ));
    }

    #[test]
    fn test_blocked_endpoint() {
        let mut grid = TileGrid::new(10, 10, 32.0);
        grid.set_occupied(GridCoord::new(5, 5), true);

        assert!(!line_of_sight(
            &grid,
            GridCoord::new(0, 0),
            GridCoord::new(5, 5)
        ));
        assert!(!line_of_sight(
            &grid,
            GridCoord::new(5, 5),
            GridCoord::new(0, 0)
        ));
    }

    #[test]
    fn test_single_cell() {
        let grid = TileGrid::new(4, 4, 32.0);
        let c = GridCoord::new(2, 2);
        assert!(line_of_sight(&grid, c, c));
    }
}
