//! Configuration for agent behavior.

use crate::pathfinding::PlannerConfig;
use thiserror::Error;

/// Invalid configuration value.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    #[error("capacity must be non-zero")]
    ZeroCapacity,
}

/// Configuration for agent behavior.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Movement speed in world units per second.
    /// Default: 64.0
    pub speed: f32,

    /// Inventory capacity of a freshly spawned agent.
    /// Default: 10
    pub capacity: u32,

    /// Radius around the agent searched for eligible targets while idle
    /// (world units). Default: 320.0
    pub search_radius: f32,

    /// Distance to a target below which the agent starts acting on it
    /// (world units). Default: 24.0
    pub action_radius: f32,

    /// Distance to the base below which the agent starts unloading
    /// (world units). Default: 24.0
    pub arrival_radius: f32,

    /// Distance threshold to consider a waypoint reached (world units).
    /// Default: 4.0
    pub waypoint_tolerance: f32,

    /// Whether freshly planned paths are run through line-of-sight
    /// smoothing. Default: true
    pub smooth_paths: bool,

    /// Pathfinder configuration.
    pub planner: PlannerConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 64.0,
            capacity: 10,
            search_radius: 320.0,
            action_radius: 24.0,
            arrival_radius: 24.0,
            waypoint_tolerance: 4.0,
            smooth_paths: true,
            planner: PlannerConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for movement speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Builder-style setter for inventory capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder-style setter for the idle search radius.
    pub fn with_search_radius(mut self, radius: f32) -> Self {
        self.search_radius = radius;
        self
    }

    /// Builder-style setter for the action radius.
    pub fn with_action_radius(mut self, radius: f32) -> Self {
        self.action_radius = radius;
        self
    }

    /// Builder-style setter for the base arrival radius.
    pub fn with_arrival_radius(mut self, radius: f32) -> Self {
        self.arrival_radius = radius;
        self
    }

    /// Builder-style setter for waypoint tolerance.
    pub fn with_waypoint_tolerance(mut self, tolerance: f32) -> Self {
        self.waypoint_tolerance = tolerance;
        self
    }

    /// Builder-style setter for path smoothing.
    pub fn with_smooth_paths(mut self, smooth: bool) -> Self {
        self.smooth_paths = smooth;
        self
    }

    /// Builder-style setter for the planner configuration.
    pub fn with_planner(mut self, planner: PlannerConfig) -> Self {
        self.planner = planner;
        self
    }

    /// Validate field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("speed", self.speed),
            ("search_radius", self.search_radius),
            ("action_radius", self.action_radius),
            ("arrival_radius", self.arrival_radius),
            ("waypoint_tolerance", self.waypoint_tolerance),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.speed, 64.0);
        assert_eq!(config.capacity, 10);
        assert_eq!(config.search_radius, 320.0);
        assert_eq!(config.action_radius, 24.0);
        assert_eq!(config.arrival_radius, 24.0);
        assert_eq!(config.waypoint_tolerance, 4.0);
        assert!(config.smooth_paths);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = AgentConfig::new()
            .with_speed(100.0)
            .with_capacity(5)
            .with_smooth_paths(false);

        assert_eq!(config.speed, 100.0);
        assert_eq!(config.capacity, 5);
        assert!(!config.smooth_paths);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = AgentConfig::new().with_speed(0.0).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive { field: "speed", .. }
        ));

        let err = AgentConfig::new()
            .with_search_radius(-1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { .. }));

        let err = AgentConfig::new().with_capacity(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCapacity));
    }
}
