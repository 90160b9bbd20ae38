//! Agent behavior: task state machine, movement, configuration.

mod config;
mod controller;
mod follower;
mod state;

pub use config::{AgentConfig, ConfigError};
pub use controller::{AgentController, TickOutcome};
pub use follower::{FollowResult, PathFollower};
pub use state::{Agent, AgentState};
