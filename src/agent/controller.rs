//! The per-agent task state machine.
//!
//! Evaluated once per simulation tick: the controller inspects the current
//! state, requests a route from the planner when one is needed, advances the
//! agent along it, and transitions on proximity, inventory, and target
//! validity. At most one state transition happens per tick, and at most one
//! search is issued per tick, so per-tick cost stays bounded.
//!
//! Failure semantics: an unreachable target is abandoned immediately (back
//! to idle, no same-tick retry); a path that runs out before geometric
//! arrival triggers a replan, not an abandonment.

use super::config::AgentConfig;
use super::follower::PathFollower;
use super::state::{Agent, AgentState};
use crate::core::{GridCoord, WorldVec};
use crate::pathfinding::{smooth_path, Planner};
use crate::{DepotSink, NavGrid, TargetId, TargetRegistry, WorkOutcome};
use log::{debug, info};

/// Result of a single controller tick, for host-side observability.
#[derive(Clone, Copy, Debug)]
pub struct TickOutcome {
    /// State after this tick.
    pub state: AgentState,
    /// Whether a new path was planned this tick.
    pub replanned: bool,
    /// Inventory handed off this tick, if the agent unloaded.
    pub deposited: Option<u32>,
}

/// Drives one agent through the seek / approach / act / return / unload
/// cycle.
///
/// The grid, registry, and sink are borrowed into each [`tick`] call rather
/// than held, so the controller is trivially testable with mocks and carries
/// no ambient state.
///
/// [`tick`]: AgentController::tick
pub struct AgentController {
    /// The agent being driven.
    agent: Agent,

    /// Route computation.
    planner: Planner,

    /// Movement integration.
    follower: PathFollower,

    /// Configuration.
    config: AgentConfig,
}

impl AgentController {
    /// Create a controller for a fresh agent spawned at `spawn`.
    pub fn new(spawn: WorldVec, config: AgentConfig) -> Self {
        let planner = Planner::new(config.planner.clone());
        let follower = PathFollower::new(&config);

        Self {
            agent: Agent::new(spawn, config.capacity),
            planner,
            follower,
            config,
        }
    }

    /// Builder-style setter for the home base cell.
    pub fn with_home(mut self, home: GridCoord) -> Self {
        self.agent.home = Some(home);
        self
    }

    /// Assign (or move) the home base cell.
    pub fn set_home(&mut self, home: GridCoord) {
        self.agent.home = Some(home);
    }

    /// The driven agent.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Current task state.
    pub fn state(&self) -> AgentState {
        self.agent.state
    }

    /// Current world-space position.
    pub fn position(&self) -> WorldVec {
        self.agent.position
    }

    /// Current configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Advance the agent by one time step of `dt` seconds.
    ///
    /// Call once per agent per simulation tick, in any order relative to
    /// other agents. The grid must not be mutated during the tick.
    pub fn tick<G, R, S>(&mut self, dt: f32, grid: &G, registry: &mut R, sink: &mut S) -> TickOutcome
    where
        G: NavGrid + ?Sized,
        R: TargetRegistry + ?Sized,
        S: DepotSink + ?Sized,
    {
        let mut outcome = TickOutcome {
            state: self.agent.state,
            replanned: false,
            deposited: None,
        };

        match self.agent.state {
            AgentState::Idle => self.tick_idle(registry),
            AgentState::MovingToTarget { target } => {
                self.tick_moving(dt, grid, registry, target, &mut outcome)
            }
            AgentState::PerformingAction { target } => self.tick_performing(registry, target),
            AgentState::ReturningToBase => self.tick_returning(dt, grid, &mut outcome),
            AgentState::Unloading => self.tick_unloading(sink, &mut outcome),
        }

        outcome.state = self.agent.state;
        outcome
    }

    /// Switch states, dropping the old path.
    fn transition(&mut self, to: AgentState) {
        debug!("agent: {} -> {}", self.agent.state.name(), to.name());
        self.agent.state = to;
        self.agent.clear_path();
    }

    /// Idle: scan for work. A found target wins over a full inventory.
    fn tick_idle<R: TargetRegistry + ?Sized>(&mut self, registry: &mut R) {
        if let Some(target) =
            registry.find_nearest_eligible(self.agent.position, self.config.search_radius)
        {
            self.transition(AgentState::MovingToTarget { target });
        } else if self.agent.is_full() && self.agent.home.is_some() {
            self.transition(AgentState::ReturningToBase);
        }
    }

    /// MovingToTarget: validate, arrive, or keep travelling.
    fn tick_moving<G, R>(
        &mut self,
        dt: f32,
        grid: &G,
        registry: &mut R,
        target: TargetId,
        outcome: &mut TickOutcome,
    ) where
        G: NavGrid + ?Sized,
        R: TargetRegistry + ?Sized,
    {
        if !registry.is_still_valid(target) {
            debug!("agent: target {:?} vanished, abandoning", target);
            self.transition(AgentState::Idle);
            return;
        }

        let target_pos = match registry.position_of(target) {
            Some(pos) => pos,
            None => {
                self.transition(AgentState::Idle);
                return;
            }
        };

        if self.agent.position.distance(&target_pos) <= self.config.action_radius {
            self.transition(AgentState::PerformingAction { target });
            return;
        }

        // Plan on entry and whenever the path runs out before arrival
        // (the target may have moved, or tolerances left us short).
        if self.agent.path_exhausted() {
            let goal = grid.world_to_grid(target_pos);
            if !self.plan_route(grid, goal, outcome) {
                debug!("agent: target {:?} unreachable, abandoning", target);
                self.transition(AgentState::Idle);
                return;
            }
        }

        self.advance_along_path(dt, grid);
    }

    /// PerformingAction: drive the opaque domain action.
    fn tick_performing<R: TargetRegistry + ?Sized>(&mut self, registry: &mut R, target: TargetId) {
        match registry.work_on(target, self.agent.capacity_left()) {
            WorkOutcome::InProgress => {}
            WorkOutcome::Finished { gained } => {
                self.agent.load = (self.agent.load + gained).min(self.agent.capacity);
                if self.agent.is_full() {
                    self.transition(AgentState::ReturningToBase);
                } else {
                    self.transition(AgentState::Idle);
                }
            }
            WorkOutcome::Lost => {
                debug!("agent: target {:?} lost mid-action", target);
                self.transition(AgentState::Idle);
            }
        }
    }

    /// ReturningToBase: travel home, retrying the route every tick it is
    /// missing. Without an assigned base the agent stays parked here.
    fn tick_returning<G: NavGrid + ?Sized>(
        &mut self,
        dt: f32,
        grid: &G,
        outcome: &mut TickOutcome,
    ) {
        let home = match self.agent.home {
            Some(home) => home,
            None => return,
        };

        let home_pos = grid.grid_to_world(home);
        if self.agent.position.distance(&home_pos) <= self.config.arrival_radius {
            self.transition(AgentState::Unloading);
            return;
        }

        if self.agent.path_exhausted() && !self.plan_route(grid, home, outcome) {
            // Base is assumed reachable in normal operation; keep retrying.
            debug!("agent: no route to base yet, retrying next tick");
            return;
        }

        self.advance_along_path(dt, grid);
    }

    /// Unloading: one hand-off, then back to idle.
    fn tick_unloading<S: DepotSink + ?Sized>(&mut self, sink: &mut S, outcome: &mut TickOutcome) {
        let amount = self.agent.load;
        sink.deposit(amount);
        info!("agent: deposited {} at base", amount);
        self.agent.load = 0;
        outcome.deposited = Some(amount);
        self.transition(AgentState::Idle);
    }

    /// Request a route from the current cell to `goal` and install it.
    /// Returns false when no route exists.
    fn plan_route<G: NavGrid + ?Sized>(
        &mut self,
        grid: &G,
        goal: GridCoord,
        outcome: &mut TickOutcome,
    ) -> bool {
        let start = grid.world_to_grid(self.agent.position);
        match self.planner.find_path(grid, start, goal) {
            Some(path) => {
                let path = if self.config.smooth_paths {
                    smooth_path(grid, &path)
                } else {
                    path
                };
                self.agent.set_path(path);
                outcome.replanned = true;
                true
            }
            None => false,
        }
    }

    /// Consume waypoints and integrate position for one tick.
    fn advance_along_path<G: NavGrid + ?Sized>(&mut self, dt: f32, grid: &G) {
        let result = self.follower.follow(
            grid,
            self.agent.position,
            &self.agent.path,
            self.agent.path_index,
            dt,
        );
        self.agent.position = result.position;
        self.agent.path_index = result.path_index;
    }
}
