//! Concrete grid adapter implementation.

mod tile_grid;

pub use tile_grid::{TileGrid, TileKind};
