//! Compact tile grid implementing the [`NavGrid`] adapter.
//!
//! Walkability combines a static tile kind (floor vs. wall) with a dynamic
//! occupancy mark for obstacles that come and go at runtime (constructed
//! buildings, parked agents). Mutation belongs to external collaborators;
//! the navigation core only reads.

use crate::core::{GridCoord, WorldVec};
use crate::NavGrid;
use serde::{Deserialize, Serialize};

/// Static kind of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Traversable ground.
    #[default]
    Floor,
    /// Permanently blocking tile.
    Wall,
}

impl TileKind {
    /// Single character representation for debugging and ASCII fixtures
    pub fn as_char(self) -> char {
        match self {
            TileKind::Floor => '.',
            TileKind::Wall => '#',
        }
    }

    /// Parse from the character representation. Unknown characters are floor.
    pub fn from_char(c: char) -> Self {
        match c {
            '#' => TileKind::Wall,
            _ => TileKind::Floor,
        }
    }
}

/// Tile grid with flat row-major storage.
///
/// The grid uses a coordinate system where:
/// - Cell (0, 0) is the top-left cell, at world origin
/// - Positive X is to the right (columns)
/// - Positive Y is down (rows)
/// - Cell (x, y) covers world area `x*tile_size .. (x+1)*tile_size`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileGrid {
    /// Static tile kinds, row-major.
    tiles: Vec<TileKind>,
    /// Dynamic occupancy marks (true = blocked by an obstacle), row-major.
    occupied: Vec<bool>,
    /// Grid width in cells
    width: usize,
    /// Grid height in cells
    height: usize,
    /// World units per cell edge
    tile_size: f32,
}

impl TileGrid {
    /// Create a new all-floor grid with the given dimensions.
    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        let size = width * height;
        Self {
            tiles: vec![TileKind::Floor; size],
            occupied: vec![false; size],
            width,
            height,
            tile_size,
        }
    }

    /// Build a grid from an ASCII sketch: one row per line, `#` for wall,
    /// anything else for floor. Rows shorter than the widest row are padded
    /// with floor.
    pub fn from_ascii(text: &str, tile_size: f32) -> Self {
        let lines: Vec<&str> = text.lines().map(|l| l.trim()).collect();
        let height = lines.len();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let mut grid = Self::new(width, height, tile_size);
        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.chars().enumerate() {
                grid.set_kind(GridCoord::new(x as i32, y as i32), TileKind::from_char(c));
            }
        }
        grid
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// World units per cell edge
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Check if a coordinate is within grid bounds
    #[inline]
    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    #[inline]
    fn index(&self, coord: GridCoord) -> usize {
        coord.y as usize * self.width + coord.x as usize
    }

    /// Static kind of a cell; out-of-bounds reads as wall.
    pub fn kind(&self, coord: GridCoord) -> TileKind {
        if self.in_bounds(coord) {
            self.tiles[self.index(coord)]
        } else {
            TileKind::Wall
        }
    }

    /// Set the static kind of a cell. Out-of-bounds writes are ignored.
    pub fn set_kind(&mut self, coord: GridCoord, kind: TileKind) {
        if self.in_bounds(coord) {
            let idx = self.index(coord);
            self.tiles[idx] = kind;
        }
    }

    /// Mark or clear a dynamic obstacle on a cell.
    pub fn set_occupied(&mut self, coord: GridCoord, occupied: bool) {
        if self.in_bounds(coord) {
            let idx = self.index(coord);
            self.occupied[idx] = occupied;
        }
    }

    /// Whether a cell carries a dynamic obstacle mark.
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.in_bounds(coord) && self.occupied[self.index(coord)]
    }

    /// Render the grid as ASCII, one row per line. Occupied cells show `x`.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let coord = GridCoord::new(x as i32, y as i32);
                if self.is_occupied(coord) {
                    out.push('x');
                } else {
                    out.push(self.kind(coord).as_char());
                }
            }
            out.push('\n');
        }
        out
    }
}

impl NavGrid for TileGrid {
    fn is_walkable(&self, coord: GridCoord) -> bool {
        self.in_bounds(coord)
            && self.tiles[self.index(coord)] == TileKind::Floor
            && !self.occupied[self.index(coord)]
    }

    fn world_to_grid(&self, pos: WorldVec) -> GridCoord {
        GridCoord::new(
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        )
    }

    fn grid_to_world(&self, coord: GridCoord) -> WorldVec {
        WorldVec::new(
            (coord.x as f32 + 0.5) * self.tile_size,
            (coord.y as f32 + 0.5) * self.tile_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ascii() {
        let grid = TileGrid::from_ascii(
            "....\n\
             .##.\n\
             ....",
            32.0,
        );

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.kind(GridCoord::new(1, 1)), TileKind::Wall);
        assert_eq!(grid.kind(GridCoord::new(0, 0)), TileKind::Floor);
        assert!(grid.is_walkable(GridCoord::new(0, 0)));
        assert!(!grid.is_walkable(GridCoord::new(2, 1)));
    }

    #[test]
    fn test_out_of_bounds_not_walkable() {
        let grid = TileGrid::new(4, 4, 32.0);
        assert!(!grid.is_walkable(GridCoord::new(-1, 0)));
        assert!(!grid.is_walkable(GridCoord::new(0, 4)));
        assert_eq!(grid.kind(GridCoord::new(10, 10)), TileKind::Wall);
    }

    #[test]
    fn test_occupancy_blocks_walkability() {
        let mut grid = TileGrid::new(4, 4, 32.0);
        let c = GridCoord::new(2, 2);
        assert!(grid.is_walkable(c));

        grid.set_occupied(c, true);
        assert!(!grid.is_walkable(c));
        assert_eq!(grid.kind(c), TileKind::Floor); // static kind unchanged

        grid.set_occupied(c, false);
        assert!(grid.is_walkable(c));
    }

    #[test]
    fn test_coordinate_conversion() {
        let grid = TileGrid::new(10, 10, 32.0);

        // Cell center round-trips to the same cell
        let coord = GridCoord::new(3, 7);
        let world = grid.grid_to_world(coord);
        assert_eq!(world, WorldVec::new(112.0, 240.0));
        assert_eq!(grid.world_to_grid(world), coord);

        // Any position inside the cell maps to it
        assert_eq!(grid.world_to_grid(WorldVec::new(96.5, 224.5)), coord);
        assert_eq!(grid.world_to_grid(WorldVec::new(127.9, 255.9)), coord);
    }

    #[test]
    fn test_ascii_roundtrip() {
        let text = "...#\n#...\n....\n";
        let grid = TileGrid::from_ascii(text, 16.0);
        assert_eq!(grid.to_ascii(), text);
    }
}
