//! Line-of-sight path smoothing.
//!
//! Reduces waypoint count by greedily extending line of sight from each kept
//! waypoint as far forward as possible. Pure post-processing over an already
//! valid path: it never introduces a cell the search did not prove reachable,
//! and it is idempotent.

use crate::pathfinding::line_of_sight;
use crate::{NavGrid, Path};

/// Smooth a path using line-of-sight shortcuts.
///
/// Keeps the first waypoint, then repeatedly jumps to the furthest waypoint
/// still visible from the current one. The first and last waypoints are
/// always preserved. Paths of two or fewer waypoints are returned unchanged.
pub fn smooth_path<G: NavGrid + ?Sized>(grid: &G, path: &Path) -> Path {
    if path.len() <= 2 {
        return path.clone();
    }

    let cells = &path.cells;
    let mut smoothed = vec![cells[0]];
    let mut i = 0;

    while i < cells.len() - 1 {
        // Find the furthest visible waypoint from the current one
        let mut furthest = i + 1;

        for j in (i + 2)..cells.len() {
            if line_of_sight(grid, cells[i], cells[j]) {
                furthest = j;
            }
        }

        smoothed.push(cells[furthest]);
        i = furthest;
    }

    Path::from_cells(smoothed)
}
