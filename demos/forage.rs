//! Closed-loop foraging demo.
//!
//! Several agents forage randomly scattered targets on a walled map,
//! hauling their loads back to a shared base.
//!
//! Usage:
//!   cargo run --example forage
//!   cargo run --example forage -- --agents 8 --targets 40
//!
//! Enable logging to watch state transitions:
//!   RUST_LOG=debug cargo run --example forage

use clap::Parser;
use rand::prelude::*;
use std::collections::HashMap;

use rover_nav::core::{GridCoord, WorldVec};
use rover_nav::{
    AgentConfig, AgentController, DepotSink, NavGrid, TargetId, TargetRegistry, TileGrid, TileKind,
    WorkOutcome,
};

/// Closed-loop foraging demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map width in cells
    #[arg(long, default_value = "40")]
    width: usize,

    /// Map height in cells
    #[arg(long, default_value = "30")]
    height: usize,

    /// Number of foraging agents
    #[arg(short, long, default_value = "4")]
    agents: usize,

    /// Number of scattered targets
    #[arg(short, long, default_value = "25")]
    targets: usize,

    /// Units of stock per target
    #[arg(long, default_value = "5")]
    stock: u32,

    /// Maximum simulation ticks
    #[arg(long, default_value = "5000")]
    max_ticks: usize,

    /// Simulated seconds per tick
    #[arg(long, default_value = "0.1")]
    dt: f32,

    /// Show progress every N ticks
    #[arg(long, default_value = "250")]
    progress_interval: usize,

    /// Random seed
    #[arg(long, default_value = "7")]
    seed: u64,
}

struct DemoTarget {
    pos: WorldVec,
    stock: u32,
}

#[derive(Default)]
struct DemoRegistry {
    targets: HashMap<u64, DemoTarget>,
}

impl TargetRegistry for DemoRegistry {
    fn find_nearest_eligible(&self, origin: WorldVec, radius: f32) -> Option<TargetId> {
        self.targets
            .iter()
            .filter(|(_, t)| origin.distance(&t.pos) <= radius)
            .min_by(|a, b| {
                origin
                    .distance(&a.1.pos)
                    .partial_cmp(&origin.distance(&b.1.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(id, _)| TargetId(*id))
    }

    fn is_still_valid(&self, target: TargetId) -> bool {
        self.targets.contains_key(&target.0)
    }

    fn position_of(&self, target: TargetId) -> Option<WorldVec> {
        self.targets.get(&target.0).map(|t| t.pos)
    }

    fn work_on(&mut self, target: TargetId, capacity_left: u32) -> WorkOutcome {
        match self.targets.get_mut(&target.0) {
            None => WorkOutcome::Lost,
            Some(t) => {
                let gained = t.stock.min(capacity_left);
                t.stock -= gained;
                if t.stock == 0 {
                    self.targets.remove(&target.0);
                }
                WorkOutcome::Finished { gained }
            }
        }
    }
}

#[derive(Default)]
struct DemoDepot {
    total: u32,
    deliveries: usize,
}

impl DepotSink for DemoDepot {
    fn deposit(&mut self, amount: u32) {
        self.total += amount;
        self.deliveries += 1;
    }
}

/// Border walls plus a few random wall slabs for the planner to route around.
fn build_map(args: &Args, rng: &mut StdRng) -> TileGrid {
    let mut grid = TileGrid::new(args.width, args.height, 32.0);

    for x in 0..args.width as i32 {
        grid.set_kind(GridCoord::new(x, 0), TileKind::Wall);
        grid.set_kind(GridCoord::new(x, args.height as i32 - 1), TileKind::Wall);
    }
    for y in 0..args.height as i32 {
        grid.set_kind(GridCoord::new(0, y), TileKind::Wall);
        grid.set_kind(GridCoord::new(args.width as i32 - 1, y), TileKind::Wall);
    }

    let slabs = (args.width * args.height) / 120;
    for _ in 0..slabs {
        let x = rng.gen_range(3..args.width as i32 - 3);
        let y = rng.gen_range(3..args.height as i32 - 3);
        let len = rng.gen_range(2..6);
        let horizontal = rng.gen_bool(0.5);
        for i in 0..len {
            let c = if horizontal {
                GridCoord::new(x + i, y)
            } else {
                GridCoord::new(x, y + i)
            };
            grid.set_kind(c, TileKind::Wall);
        }
    }

    grid
}

fn random_floor_cell(grid: &TileGrid, rng: &mut StdRng) -> GridCoord {
    loop {
        let c = GridCoord::new(
            rng.gen_range(1..grid.width() as i32 - 1),
            rng.gen_range(1..grid.height() as i32 - 1),
        );
        if grid.is_walkable(c) {
            return c;
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let grid = build_map(&args, &mut rng);
    let base = GridCoord::new(1, 1);

    let mut registry = DemoRegistry::default();
    let total_stock = args.targets as u32 * args.stock;
    for id in 0..args.targets as u64 {
        let cell = random_floor_cell(&grid, &mut rng);
        registry.targets.insert(
            id,
            DemoTarget {
                pos: grid.grid_to_world(cell),
                stock: args.stock,
            },
        );
    }

    let config = AgentConfig::default().with_search_radius(
        (args.width.max(args.height) as f32) * grid.tile_size() * 2.0,
    );
    let mut controllers: Vec<AgentController> = (0..args.agents)
        .map(|_| AgentController::new(grid.grid_to_world(base), config.clone()).with_home(base))
        .collect();

    println!(
        "forage: {}x{} map, {} agents, {} targets ({} stock total)",
        args.width, args.height, args.agents, args.targets, total_stock
    );

    let mut depot = DemoDepot::default();
    let mut ticks = 0;

    for tick in 0..args.max_ticks {
        ticks = tick + 1;
        for controller in &mut controllers {
            controller.tick(args.dt, &grid, &mut registry, &mut depot);
        }

        if ticks % args.progress_interval == 0 {
            println!(
                "tick {:5}: {:3} targets left, {:4}/{} delivered, {} trips",
                ticks,
                registry.targets.len(),
                depot.total,
                total_stock,
                depot.deliveries,
            );
        }

        // Done once everything is harvested and every agent has unloaded
        if registry.targets.is_empty() && controllers.iter().all(|c| c.agent().load == 0) {
            break;
        }
    }

    println!(
        "finished after {} ticks: {}/{} units delivered in {} trips",
        ticks, depot.total, total_stock, depot.deliveries
    );
    for (i, controller) in controllers.iter().enumerate() {
        let pos = controller.position();
        println!(
            "  agent {}: {} at ({:.0}, {:.0})",
            i,
            controller.state().name(),
            pos.x,
            pos.y
        );
    }
}
