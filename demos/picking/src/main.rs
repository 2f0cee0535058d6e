//! picking — a small warehouse shift for the picking simulator.
//!
//! Six workers serve a random stream of shelf → dock orders on the
//! reference 20×15 layout for 500 ticks, writing CSV output to
//! `output/picking`.
//!
//! ```text
//! picking [MAP.txt] [ORDERS.csv]
//! ```
//!
//! A map file replaces the reference layout; an orders file replaces the
//! random stream with a release-tick schedule.  Log verbosity follows
//! `RUST_LOG` (default `info`).

use std::path::Path;
use std::time::Instant;

use anyhow::{Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wh_core::{Cell, SimConfig, Tick};
use wh_grid::{GridMap, load_map, standard_layout};
use wh_order::{
    OrderRequest, OrderSource, OrderStatus, RandomOrderConfig, RandomOrderSource, ScheduledOrders,
    load_orders_csv,
};
use wh_output::{CsvWriter, OutputWriter, SimOutputObserver};
use wh_sim::{RunSummary, SimBuilder, SimObserver, TickEvent};

// ── Constants ─────────────────────────────────────────────────────────────────

const WORKER_COUNT:        usize = 6;
const SEED:                u64   = 42;
const TOTAL_TICKS:         u64   = 500;
const TICK_DURATION_SECS:  u32   = 2;
const ARRIVAL_PROBABILITY: f64   = 0.15;
const MAX_ORDERS:          usize = 60;
const PROGRESS_EVERY:      u64   = 100;
const OUTPUT_DIR:          &str  = "output/picking";

// ── Order stream ──────────────────────────────────────────────────────────────

enum DemoOrders {
    Random(RandomOrderSource),
    Scheduled(ScheduledOrders),
}

impl OrderSource for DemoOrders {
    fn poll(&mut self, tick: Tick, grid: &GridMap) -> Vec<OrderRequest> {
        match self {
            DemoOrders::Random(s)    => s.poll(tick, grid),
            DemoOrders::Scheduled(s) => s.poll(tick, grid),
        }
    }
}

// ── Observer wrapper with progress logging ────────────────────────────────────

struct ProgressObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    position_rows: usize,
    transitions:   usize,
}

impl<W: OutputWriter> ProgressObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, position_rows: 0, transitions: 0 }
    }
}

impl<W: OutputWriter> SimObserver for ProgressObserver<W> {
    fn on_tick_end(&mut self, event: &TickEvent) {
        self.position_rows += event.positions.len();
        self.transitions += event.order_transitions.len() + event.worker_transitions.len();
        if event.tick.0 % PROGRESS_EVERY == 0 {
            info!(tick = %event.tick, transitions = self.transitions, "progress");
        }
        self.inner.on_tick_end(event);
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        self.inner.on_sim_end(summary);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // 1. Floor.
    let grid = match args.first() {
        Some(path) => load_map(Path::new(path))?,
        None => standard_layout(20, 15)?,
    };
    println!(
        "Floor: {}×{}, {} walkable cells, {} shelves, {} docks",
        grid.width(),
        grid.height(),
        grid.walkable_count(),
        grid.shelf_count(),
        grid.docks().len()
    );

    // 2. Workers start on the first walkable cells, column by column.
    let mut starts: Vec<Cell> = grid.walkable_cells().collect();
    starts.sort_by_key(|c| (c.x, c.y));
    starts.truncate(WORKER_COUNT);
    if starts.len() < WORKER_COUNT {
        bail!("floor has room for only {} workers", starts.len());
    }

    // 3. Config.
    let config = SimConfig {
        total_ticks:        TOTAL_TICKS,
        seed:               SEED,
        tick_duration_secs: TICK_DURATION_SECS,
        ..SimConfig::default()
    };

    // 4. Orders, seeded from the run config.
    let orders = match args.get(1) {
        Some(path) => {
            let schedule = load_orders_csv(Path::new(path))?;
            println!("Loaded {} scheduled orders", schedule.len());
            DemoOrders::Scheduled(schedule)
        }
        None => DemoOrders::Random(RandomOrderSource::for_run(
            &config,
            RandomOrderConfig {
                arrival_probability: ARRIVAL_PROBABILITY,
                max_orders: MAX_ORDERS,
                ..RandomOrderConfig::default()
            },
        )),
    };

    // 5. Sim.
    let mut sim = SimBuilder::astar(config.clone(), grid)
        .workers(starts)
        .order_source(orders)
        .build()?;

    // 6. Output.
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = ProgressObserver::new(SimOutputObserver::new(writer, &config));

    // 7. Run.
    let t0 = Instant::now();
    let outcome = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 8. Summary.
    let summary = sim.summary();
    println!();
    println!("Simulated {} ticks in {:.3} s", outcome.ticks_run, elapsed.as_secs_f64());
    println!("  positions.csv   : {} rows", obs.position_rows);
    println!("  transitions.csv : {} rows", obs.transitions);
    println!(
        "Orders: {} completed, {} failed, {} open, {} rejected",
        summary.count(OrderStatus::Completed),
        summary.count(OrderStatus::Failed),
        summary.orders.iter().filter(|o| !o.status.is_terminal()).count(),
        summary.rejected_orders,
    );
    if let Some(lead) = summary.mean_lead_time() {
        println!("Mean lead time: {lead:.1} ticks ({:.0} s)", lead * TICK_DURATION_SECS as f64);
    }
    println!();

    println!("{:<8} {:>10} {:>10} {:>10}", "Worker", "Distance", "Idle", "Orders");
    println!("{}", "-".repeat(41));
    for w in &summary.workers {
        println!(
            "{:<8} {:>10} {:>10} {:>10}",
            w.id.0, w.distance_traveled, w.idle_ticks, w.orders_completed
        );
    }

    Ok(())
}
