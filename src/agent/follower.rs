//! Waypoint-based movement integration.
//!
//! Each tick the follower aims at the next unconsumed waypoint's world-space
//! center: waypoints within tolerance are consumed, then the position is
//! integrated towards the next one at the configured speed. This is linear
//! interpolation along discrete waypoints; any curvature comes from the
//! waypoint density the smoothing pass left behind.

use super::config::AgentConfig;
use crate::core::WorldVec;
use crate::{NavGrid, Path};

/// Result of a path following step.
#[derive(Clone, Copy, Debug)]
pub struct FollowResult {
    /// Updated position after integration.
    pub position: WorldVec,
    /// Updated waypoint index.
    pub path_index: usize,
    /// Whether the path is complete (all waypoints consumed).
    pub path_complete: bool,
    /// Distance to the current target waypoint after moving.
    pub distance_to_waypoint: f32,
}

/// Path follower for waypoint-based navigation.
#[derive(Clone, Debug)]
pub struct PathFollower {
    /// Movement speed in world units per second.
    speed: f32,
    /// Distance below which a waypoint counts as reached.
    waypoint_tolerance: f32,
}

impl PathFollower {
    /// Create a new path follower from agent config.
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            speed: config.speed,
            waypoint_tolerance: config.waypoint_tolerance,
        }
    }

    /// Create a path follower with explicit parameters.
    pub fn with_params(speed: f32, waypoint_tolerance: f32) -> Self {
        Self {
            speed,
            waypoint_tolerance,
        }
    }

    /// Advance one tick along the path.
    ///
    /// Consumes leading waypoints already within tolerance (a fresh path
    /// starts at the agent's own cell), then moves towards the next one.
    /// The step is clamped to the remaining distance so waypoint centers
    /// are hit exactly rather than orbited.
    pub fn follow<G: NavGrid + ?Sized>(
        &self,
        grid: &G,
        position: WorldVec,
        path: &Path,
        path_index: usize,
        dt: f32,
    ) -> FollowResult {
        let mut index = path_index;

        // Skip waypoints we are already standing on
        while index < path.len() {
            let center = grid.grid_to_world(path.cells[index]);
            if position.distance(&center) >= self.waypoint_tolerance {
                break;
            }
            index += 1;
        }

        if index >= path.len() {
            return FollowResult {
                position,
                path_index: index,
                path_complete: true,
                distance_to_waypoint: 0.0,
            };
        }

        let target = grid.grid_to_world(path.cells[index]);
        let to_target = target - position;
        let distance = to_target.length();
        let step = (self.speed * dt).min(distance);
        let new_position = position + to_target.normalized() * step;

        FollowResult {
            position: new_position,
            path_index: index,
            path_complete: false,
            distance_to_waypoint: new_position.distance(&target),
        }
    }
}
