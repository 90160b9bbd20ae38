//! Route computation: A* search, line of sight, and path smoothing.
//!
//! All entry points borrow the grid per call and keep no state between
//! calls; other systems may use them directly, independent of the agent
//! controller.

mod astar;
mod los;
mod smoothing;

pub use astar::{find_path, PlanFailure, PlanResult, Planner, PlannerConfig};
pub use los::line_of_sight;
pub use smoothing::smooth_path;
