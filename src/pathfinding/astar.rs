//! A* pathfinding over a [`NavGrid`].
//!
//! Weighted 8-connected search with:
//! - Corner-cutting prevention (a diagonal step requires both flanking
//!   orthogonal cells to be walkable)
//! - Manhattan heuristic (admissible for unit/sqrt(2) edge costs)
//! - Deterministic tie-breaking (lower heuristic wins equal priority)
//! - A hard expansion ceiling against pathological grids

use crate::core::GridCoord;
use crate::{NavGrid, Path};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Movement directions: 4 cardinal then 4 diagonal.
const DIRECTIONS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// A node in the search arena. Parent is an index into the same arena,
/// which lives only for the duration of one `plan` call.
#[derive(Clone, Debug)]
struct SearchNode {
    coord: GridCoord,
    parent: Option<usize>,
    g: f32, // Cost from start
    h: f32, // Heuristic estimate to goal
}

/// Open-set entry. The heap is lazy: improving a cell pushes a fresh entry
/// and the stale one is skipped when popped.
#[derive(Clone, Debug)]
struct OpenEntry {
    f: f32,
    h: f32,
    coord: GridCoord,
    node: usize,
}

impl Eq for OpenEntry {}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; ties broken by lower h,
        // then coordinate order, so expansion order is deterministic.
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.h.partial_cmp(&self.h).unwrap_or(Ordering::Equal))
            .then_with(|| (other.coord.y, other.coord.x).cmp(&(self.coord.y, self.coord.x)))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Planner configuration
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    /// Maximum number of nodes to expand before giving up.
    /// Default: 1000
    pub max_expansions: usize,
    /// Diagonal movement cost (sqrt(2) ≈ 1.414).
    /// Default: sqrt(2)
    pub diagonal_cost: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_expansions: 1000,
            diagonal_cost: std::f32::consts::SQRT_2,
        }
    }
}

impl PlannerConfig {
    /// Builder-style setter for the expansion ceiling.
    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = max;
        self
    }

    /// Builder-style setter for the diagonal cost.
    pub fn with_diagonal_cost(mut self, cost: f32) -> Self {
        self.diagonal_cost = cost;
        self
    }
}

/// Reason a plan failed.
///
/// Diagnostics only: the controller treats every failure identically
/// (abandon, go idle, retry later).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanFailure {
    /// Start cell is not walkable.
    StartBlocked,
    /// Goal cell is not walkable.
    GoalBlocked,
    /// The open set emptied without reaching the goal.
    NoRoute,
    /// The expansion ceiling was hit first.
    SearchLimit,
}

/// Result of a plan request.
#[derive(Clone, Debug)]
pub struct PlanResult {
    /// The computed path (empty on failure).
    pub path: Path,
    /// Total weighted cost of the path.
    pub cost: f32,
    /// Number of nodes expanded during the search.
    pub nodes_expanded: usize,
    /// Whether a path was found.
    pub success: bool,
    /// Reason for failure (if any).
    pub failure: Option<PlanFailure>,
}

impl PlanResult {
    fn failed(reason: PlanFailure, nodes_expanded: usize) -> Self {
        Self {
            path: Path::new(),
            cost: f32::INFINITY,
            nodes_expanded,
            success: false,
            failure: Some(reason),
        }
    }
}

/// Stateless-per-call A* planner.
///
/// The grid is borrowed for each call rather than held in the planner, so
/// one planner can serve any number of agents and grids.
#[derive(Clone, Debug, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Create a planner with the given configuration.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Create a planner with default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Current configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Find a path from `start` to `goal`, `None` if unreachable.
    ///
    /// This is the narrow form; absence of a route is an expected outcome,
    /// not an error. Use [`Planner::plan`] for the failure reason and
    /// search statistics.
    pub fn find_path<G: NavGrid + ?Sized>(
        &self,
        grid: &G,
        start: GridCoord,
        goal: GridCoord,
    ) -> Option<Path> {
        let result = self.plan(grid, start, goal);
        result.success.then_some(result.path)
    }

    /// Find a path from `start` to `goal` with full diagnostics.
    pub fn plan<G: NavGrid + ?Sized>(
        &self,
        grid: &G,
        start: GridCoord,
        goal: GridCoord,
    ) -> PlanResult {
        trace!(
            "[Planner] plan: start=({},{}) goal=({},{})",
            start.x,
            start.y,
            goal.x,
            goal.y
        );

        if !grid.is_walkable(start) {
            debug!("[Planner] FAILED: StartBlocked at ({},{})", start.x, start.y);
            return PlanResult::failed(PlanFailure::StartBlocked, 0);
        }
        if !grid.is_walkable(goal) {
            debug!("[Planner] FAILED: GoalBlocked at ({},{})", goal.x, goal.y);
            return PlanResult::failed(PlanFailure::GoalBlocked, 0);
        }

        // "Already there" is representable without a special case downstream.
        if start == goal {
            return PlanResult {
                path: Path::from_cells(vec![start]),
                cost: 0.0,
                nodes_expanded: 0,
                success: true,
                failure: None,
            };
        }

        // Node arena scoped to this call; parents are arena indices.
        let mut arena: Vec<SearchNode> = Vec::new();
        let mut open = BinaryHeap::new();
        let mut closed: HashSet<GridCoord> = HashSet::new();
        // Best-known arena node per cell; a popped entry pointing elsewhere
        // is stale.
        let mut best: HashMap<GridCoord, usize> = HashMap::new();

        arena.push(SearchNode {
            coord: start,
            parent: None,
            g: 0.0,
            h: heuristic(start, goal),
        });
        best.insert(start, 0);
        open.push(open_entry(&arena, 0));

        let mut nodes_expanded = 0;

        while let Some(entry) = open.pop() {
            if closed.contains(&entry.coord) {
                continue;
            }
            if best.get(&entry.coord) != Some(&entry.node) {
                continue; // stale duplicate
            }

            if entry.coord == goal {
                return self.reconstruct(&arena, entry.node, nodes_expanded);
            }

            closed.insert(entry.coord);
            nodes_expanded += 1;

            if nodes_expanded > self.config.max_expansions {
                debug!(
                    "[Planner] FAILED: SearchLimit after {} expansions",
                    nodes_expanded
                );
                return PlanResult::failed(PlanFailure::SearchLimit, nodes_expanded);
            }

            let current = entry.coord;
            let current_g = arena[entry.node].g;

            for (i, (dx, dy)) in DIRECTIONS.iter().enumerate() {
                let neighbor = GridCoord::new(current.x + dx, current.y + dy);

                if closed.contains(&neighbor) {
                    continue;
                }
                if !grid.is_walkable(neighbor) {
                    continue;
                }

                let is_diagonal = i >= 4;
                if is_diagonal {
                    // Corner-cutting rule: both orthogonal cells flanking a
                    // diagonal step must be walkable.
                    let flank_a = GridCoord::new(current.x + dx, current.y);
                    let flank_b = GridCoord::new(current.x, current.y + dy);
                    if !grid.is_walkable(flank_a) || !grid.is_walkable(flank_b) {
                        continue;
                    }
                }

                let move_cost = if is_diagonal {
                    self.config.diagonal_cost
                } else {
                    1.0
                };
                let tentative_g = current_g + move_cost;

                if let Some(&known) = best.get(&neighbor) {
                    if arena[known].g <= tentative_g {
                        continue;
                    }
                }

                arena.push(SearchNode {
                    coord: neighbor,
                    parent: Some(entry.node),
                    g: tentative_g,
                    h: heuristic(neighbor, goal),
                });
                let idx = arena.len() - 1;
                best.insert(neighbor, idx);
                open.push(open_entry(&arena, idx));
            }
        }

        debug!(
            "[Planner] FAILED: NoRoute after expanding {} nodes",
            nodes_expanded
        );
        PlanResult::failed(PlanFailure::NoRoute, nodes_expanded)
    }

    /// Walk parent links from the goal node back to the start, then reverse.
    fn reconstruct(
        &self,
        arena: &[SearchNode],
        goal_node: usize,
        nodes_expanded: usize,
    ) -> PlanResult {
        let cost = arena[goal_node].g;
        let mut cells = Vec::new();
        let mut current = Some(goal_node);

        while let Some(idx) = current {
            cells.push(arena[idx].coord);
            current = arena[idx].parent;
        }
        cells.reverse();

        trace!(
            "[Planner] SUCCESS: path length={} cells, cost={:.2}, nodes_expanded={}",
            cells.len(),
            cost,
            nodes_expanded
        );

        PlanResult {
            path: Path::from_cells(cells),
            cost,
            nodes_expanded,
            success: true,
            failure: None,
        }
    }
}

/// Build the open-set entry for an arena node, with `f = g + h`.
#[inline]
fn open_entry(arena: &[SearchNode], node: usize) -> OpenEntry {
    let n = &arena[node];
    OpenEntry {
        f: n.g + n.h,
        h: n.h,
        coord: n.coord,
        node,
    }
}

/// Manhattan distance heuristic.
///
/// Under-estimates true diagonal-aware cost, so the search stays admissible.
/// Octile distance would prune tighter; see DESIGN notes for why it is not
/// used here.
#[inline]
fn heuristic(from: GridCoord, to: GridCoord) -> f32 {
    from.manhattan_distance(&to) as f32
}

/// Quick path finding with default configuration.
pub fn find_path<G: NavGrid + ?Sized>(
    grid: &G,
    start: GridCoord,
    goal: GridCoord,
) -> Option<Path> {
    Planner::with_defaults().find_path(grid, start, goal)
}
