//! Agent data record and task state.

use crate::core::{GridCoord, WorldVec};
use crate::{Path, TargetId};
use serde::{Deserialize, Serialize};

/// Current task state. Exactly one is active per agent per tick.
///
/// The target-carrying variants hold the task reference structurally;
/// `ReturningToBase` and `Unloading` operate on the agent's known home
/// coordinate. The machine cycles indefinitely; there is no terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    /// No task; scanning for work each tick.
    Idle,
    /// Travelling towards an acquired target.
    MovingToTarget {
        /// The target being approached.
        target: TargetId,
    },
    /// Within action radius, driving the domain action.
    PerformingAction {
        /// The target being worked on.
        target: TargetId,
    },
    /// Travelling towards the home base.
    ReturningToBase,
    /// Arrived at the base; handing off inventory.
    Unloading,
}

impl AgentState {
    /// Get a short description of the state.
    pub fn name(&self) -> &'static str {
        match self {
            AgentState::Idle => "Idle",
            AgentState::MovingToTarget { .. } => "MovingToTarget",
            AgentState::PerformingAction { .. } => "PerformingAction",
            AgentState::ReturningToBase => "ReturningToBase",
            AgentState::Unloading => "Unloading",
        }
    }

    /// Whether the agent currently has no task.
    pub fn is_idle(&self) -> bool {
        matches!(self, AgentState::Idle)
    }

    /// The task target, for the states that carry one.
    pub fn target(&self) -> Option<TargetId> {
        match self {
            AgentState::MovingToTarget { target } | AgentState::PerformingAction { target } => {
                Some(*target)
            }
            _ => None,
        }
    }
}

/// One agent's mutable record.
///
/// Position is continuous world space, distinct from grid space. The agent
/// owns its current path exclusively until it is replaced or exhausted; it
/// does not own the grid or the target entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    /// Position in world units.
    pub position: WorldVec,
    /// Current task state.
    pub state: AgentState,
    /// Current route (possibly empty).
    pub path: Path,
    /// Index of the next unconsumed waypoint. `path_index == path.len()`
    /// means exhausted: new plan needed, or arrived.
    pub path_index: usize,
    /// Current inventory load. Never exceeds `capacity`; the work callback
    /// is the load-mutation boundary and is offered only the remainder.
    pub load: u32,
    /// Inventory capacity.
    pub capacity: u32,
    /// Home base cell, if one has been assigned.
    pub home: Option<GridCoord>,
}

impl Agent {
    /// Create an idle agent at `position` with the given capacity.
    pub fn new(position: WorldVec, capacity: u32) -> Self {
        Self {
            position,
            state: AgentState::Idle,
            path: Path::new(),
            path_index: 0,
            load: 0,
            capacity,
            home: None,
        }
    }

    /// Whether the inventory is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.load >= self.capacity
    }

    /// Remaining inventory capacity.
    #[inline]
    pub fn capacity_left(&self) -> u32 {
        self.capacity.saturating_sub(self.load)
    }

    /// Whether the current path has been consumed (or never existed).
    #[inline]
    pub fn path_exhausted(&self) -> bool {
        self.path_index >= self.path.len()
    }

    /// Drop the current path.
    pub fn clear_path(&mut self) {
        self.path = Path::new();
        self.path_index = 0;
    }

    /// Install a freshly planned path.
    pub fn set_path(&mut self, path: Path) {
        self.path = path;
        self.path_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(AgentState::Idle.name(), "Idle");
        assert_eq!(
            AgentState::MovingToTarget {
                target: TargetId(1)
            }
            .name(),
            "MovingToTarget"
        );
        assert_eq!(AgentState::Unloading.name(), "Unloading");
    }

    #[test]
    fn test_state_target() {
        let t = TargetId(7);
        assert_eq!(AgentState::MovingToTarget { target: t }.target(), Some(t));
        assert_eq!(AgentState::PerformingAction { target: t }.target(), Some(t));
        assert_eq!(AgentState::ReturningToBase.target(), None);
        assert_eq!(AgentState::Idle.target(), None);
    }

    #[test]
    fn test_agent_load_accounting() {
        let mut agent = Agent::new(WorldVec::ZERO, 10);
        assert!(!agent.is_full());
        assert_eq!(agent.capacity_left(), 10);

        agent.load = 10;
        assert!(agent.is_full());
        assert_eq!(agent.capacity_left(), 0);
    }

    #[test]
    fn test_path_bookkeeping() {
        use crate::core::GridCoord;

        let mut agent = Agent::new(WorldVec::ZERO, 5);
        assert!(agent.path_exhausted());

        agent.set_path(Path::from_cells(vec![
            GridCoord::new(0, 0),
            GridCoord::new(1, 0),
        ]));
        assert!(!agent.path_exhausted());
        assert_eq!(agent.path_index, 0);

        agent.path_index = 2;
        assert!(agent.path_exhausted());

        agent.clear_path();
        assert!(agent.path_exhausted());
        assert_eq!(agent.path_index, 0);
    }

    #[test]
    fn test_persisted_surface_roundtrip() {
        // The save/load subsystem serializes the state tag, task reference,
        // and path progress; make sure that surface stays serializable.
        use crate::core::GridCoord;

        let mut agent = Agent::new(WorldVec::new(16.0, 16.0), 10);
        agent.state = AgentState::MovingToTarget {
            target: TargetId(99),
        };
        agent.set_path(Path::from_cells(vec![
            GridCoord::new(0, 0),
            GridCoord::new(1, 1),
        ]));
        agent.path_index = 1;

        let json = serde_json::to_string(&agent).unwrap();
        let back: Agent = serde_json::from_str(&json).unwrap();

        assert_eq!(back.state, agent.state);
        assert_eq!(back.path, agent.path);
        assert_eq!(back.path_index, 1);
        assert_eq!(back.home, None);
    }
}
