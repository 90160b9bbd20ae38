//! Coordinate types for the navigation core.
//!
//! Two distinct spaces: integer grid cells ([`GridCoord`]) and continuous
//! world units ([`WorldVec`]). Conversion between them goes through the
//! grid adapter, which owns the tile size.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Grid coordinates (integer cell indices)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// X coordinate (column index)
    pub x: i32,
    /// Y coordinate (row index)
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate
    #[inline]
    pub fn manhattan_distance(&self, other: &GridCoord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance (max of x and y distance) - used for 8-connected grids
    #[inline]
    pub fn chebyshev_distance(&self, other: &GridCoord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Whether `other` is one of the 8 surrounding cells (or this cell itself)
    #[inline]
    pub fn is_adjacent_8(&self, other: &GridCoord) -> bool {
        self.chebyshev_distance(other) <= 1
    }
}

impl Add for GridCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        GridCoord::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for GridCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        GridCoord::new(self.x - other.x, self.y - other.y)
    }
}

/// World coordinates (continuous units, f32).
///
/// Doubles as a 2D vector for velocities and offsets.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldVec {
    /// X coordinate in world units
    pub x: f32,
    /// Y coordinate in world units
    pub y: f32,
}

impl WorldVec {
    /// Create a new world vector
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector (origin)
    pub const ZERO: WorldVec = WorldVec { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldVec) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared distance (faster, avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &WorldVec) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Length (magnitude) of this vector
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Normalize to unit length (zero vector stays zero)
    #[inline]
    pub fn normalized(&self) -> WorldVec {
        let len = self.length();
        if len > 0.0 {
            WorldVec::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    /// Dot product with another vector
    #[inline]
    pub fn dot(&self, other: &WorldVec) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for WorldVec {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        WorldVec::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for WorldVec {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        WorldVec::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for WorldVec {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        WorldVec::new(self.x * scalar, self.y * scalar)
    }
}
