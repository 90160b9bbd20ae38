//! # Rover-Nav: Navigation and Task-Execution Core for Grid-Bound Agents
//!
//! Computes collision-free routes on a tile grid and drives agents through a
//! cycle of high-level tasks: seek a target, approach it, act on it, return to
//! a home base, unload, repeat.
//!
//! ## Components
//!
//! - [`pathfinding`]: weighted 8-directional A* with corner-cutting
//!   prevention ([`Planner`]), Bresenham line-of-sight, and greedy
//!   line-of-sight path smoothing
//! - [`agent`]: the per-agent task state machine ([`AgentController`]) and
//!   waypoint follower, advanced once per simulation tick
//! - [`grid`]: [`TileGrid`], a compact concrete grid adapter used by tests,
//!   the demo, and hosts that do not bring their own
//!
//! The world the agents live in is consumed through three narrow traits
//! ([`NavGrid`], [`TargetRegistry`], [`DepotSink`]); everything else -
//! rendering, economics, world generation, persistence - stays outside.
//!
//! ## Quick Start
//!
//! ```rust
//! use rover_nav::{Planner, TileGrid};
//! use rover_nav::core::GridCoord;
//!
//! let grid = TileGrid::from_ascii(
//!     "..........\n\
//!      ....#.....\n\
//!      ....#.....\n\
//!      ..........",
//!     32.0,
//! );
//!
//! let planner = Planner::with_defaults();
//! let path = planner
//!     .find_path(&grid, GridCoord::new(0, 2), GridCoord::new(9, 2))
//!     .expect("corridor is open");
//! assert_eq!(path.first(), Some(GridCoord::new(0, 2)));
//! assert_eq!(path.last(), Some(GridCoord::new(9, 2)));
//! ```
//!
//! ## Concurrency Model
//!
//! Single-threaded, synchronous, tick-driven. A search runs to completion
//! (bounded by an expansion ceiling) inside the tick that requests it, so
//! worst-case per-tick latency is bounded. Agents are updated sequentially
//! and do not coordinate; grid state is read-only from this crate.

pub mod agent;
pub mod core;
pub mod grid;
pub mod pathfinding;

// Re-export main types at crate root
pub use agent::{
    Agent, AgentConfig, AgentController, AgentState, ConfigError, FollowResult, PathFollower,
    TickOutcome,
};
pub use grid::{TileGrid, TileKind};
pub use pathfinding::{line_of_sight, smooth_path, PlanFailure, PlanResult, Planner, PlannerConfig};

use crate::core::{GridCoord, WorldVec};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Consumed Interfaces and Supporting Types
// ─────────────────────────────────────────────────────────────────────────────

/// Stable identifier for a task target in the external entity registry.
///
/// This is the reference the save/load subsystem persists; the entity behind
/// it may disappear at any time (consumed by another agent, deconstructed),
/// which [`TargetRegistry::is_still_valid`] detects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// An ordered sequence of grid cells from start to goal inclusive.
///
/// Immutable once returned by the planner; every cell was walkable at
/// computation time. A cell becoming blocked afterwards is a normal runtime
/// condition, handled by replanning on exhaustion, not an invariant break.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Waypoints along the path.
    pub cells: Vec<GridCoord>,
}

impl Path {
    /// Create a new empty path.
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Create a path from a waypoint sequence.
    pub fn from_cells(cells: Vec<GridCoord>) -> Self {
        Self { cells }
    }

    /// Number of waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the path is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First waypoint (the start cell), if any.
    #[inline]
    pub fn first(&self) -> Option<GridCoord> {
        self.cells.first().copied()
    }

    /// Last waypoint (the goal cell), if any.
    #[inline]
    pub fn last(&self) -> Option<GridCoord> {
        self.cells.last().copied()
    }

    /// Waypoint at `index`, if in range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<GridCoord> {
        self.cells.get(index).copied()
    }

    /// Total weighted length: 1.0 per cardinal step, sqrt(2) per diagonal step.
    ///
    /// Steps longer than one cell (produced by smoothing) count their
    /// Euclidean cell distance.
    pub fn weighted_length(&self) -> f32 {
        self.cells
            .windows(2)
            .map(|w| {
                let dx = (w[1].x - w[0].x) as f32;
                let dy = (w[1].y - w[0].y) as f32;
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }
}

/// Outcome of driving the domain action on a target for one tick.
///
/// The action itself (harvesting, demolition, pickup - whatever the host
/// simulates) is opaque to this crate; the registry reports only how it went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkOutcome {
    /// Action still running; stay in place and keep working next tick.
    InProgress,
    /// Action finished and yielded `gained` units of inventory.
    Finished {
        /// Inventory gained, already clamped by the registry to the
        /// remaining capacity it was offered.
        gained: u32,
    },
    /// Target vanished mid-action (consumed by another agent, removed).
    Lost,
}

/// Walkability and coordinate-space queries, consumed from the host grid.
///
/// `is_walkable` must be false for out-of-bounds cells, permanently blocking
/// tile kinds, and cells currently occupied by a static obstacle. If the host
/// updates agents in parallel it must guarantee the grid is not mutated
/// during the tick; this crate never writes to it.
pub trait NavGrid {
    /// True iff the cell may be occupied or traversed right now.
    fn is_walkable(&self, coord: GridCoord) -> bool;

    /// Convert a world-space position to the grid cell containing it.
    fn world_to_grid(&self, pos: WorldVec) -> GridCoord;

    /// Convert a grid cell to the world-space position of its center.
    fn grid_to_world(&self, coord: GridCoord) -> WorldVec;
}

/// Target lookup and the domain action callback, consumed from the host
/// entity registry.
pub trait TargetRegistry {
    /// Nearest eligible target within `radius` of `origin`, if any.
    /// Queried only while an agent is idle.
    fn find_nearest_eligible(&self, origin: WorldVec, radius: f32) -> Option<TargetId>;

    /// Whether the target still exists and is still claimable.
    fn is_still_valid(&self, target: TargetId) -> bool;

    /// World-space position of the target, or `None` if it is gone.
    fn position_of(&self, target: TargetId) -> Option<WorldVec>;

    /// Advance the domain action on `target` by one tick. `capacity_left` is
    /// how much inventory the agent can still take; a `Finished` outcome must
    /// not exceed it.
    fn work_on(&mut self, target: TargetId, capacity_left: u32) -> WorkOutcome;
}

/// Inventory hand-off at the home base, consumed from the host.
pub trait DepotSink {
    /// Accept a full inventory hand-off. Always succeeds; there are no
    /// partial-deposit semantics in this core.
    fn deposit(&mut self, amount: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_new() {
        let path = Path::new();
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
        assert_eq!(path.first(), None);
        assert_eq!(path.weighted_length(), 0.0);
    }

    #[test]
    fn test_path_weighted_length() {
        // Two cardinal steps then one diagonal step
        let path = Path::from_cells(vec![
            GridCoord::new(0, 0),
            GridCoord::new(1, 0),
            GridCoord::new(2, 0),
            GridCoord::new(3, 1),
        ]);
        let expected = 2.0 + std::f32::consts::SQRT_2;
        assert!((path.weighted_length() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_target_id_roundtrip() {
        let id = TargetId(42);
        let json = serde_json::to_string(&id).unwrap();
        let back: TargetId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
