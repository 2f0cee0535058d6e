//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use tracing::debug;

use wh_core::{Cell, SimConfig, Tick};
use wh_grid::GridMap;
use wh_order::{NoOrders, OrderDispatcher, OrderRequest, OrderSource};
use wh_plan::{AStarPlanner, PathPlanner, ReservationTable};
use wh_worker::WorkerStore;

use crate::{Sim, SimError, SimResult, SimulationState, StopHandle};

/// Fluent builder for [`Sim<P, S>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, replan policy, search limits, …
/// - [`GridMap`] — the floor, read-only for the whole run
/// - `P: PathPlanner` — e.g. [`wh_plan::AStarPlanner`]
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                         |
/// |----------------------|---------------------------------|
/// | `.workers(v)`        | none (build fails)              |
/// | `.orders(v)`         | no initial orders               |
/// | `.order_source(s)`   | [`NoOrders`]                    |
///
/// Search limits live in [`SimConfig::search`].  [`SimBuilder::astar`]
/// builds the default planner from them; a planner passed to
/// [`SimBuilder::new`] that reports different limits is rejected by
/// [`build`](SimBuilder::build).
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::astar(config, grid)
///     .workers(vec![Cell::new(0, 0), Cell::new(0, 4)])
///     .orders(vec![OrderRequest::new(Cell::new(4, 0), Cell::new(4, 4))])
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: PathPlanner, S: OrderSource = NoOrders> {
    config:  SimConfig,
    grid:    GridMap,
    planner: P,
    starts:  Vec<Cell>,
    orders:  Vec<OrderRequest>,
    source:  S,
}

impl<P: PathPlanner> SimBuilder<P, NoOrders> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, grid: GridMap, planner: P) -> Self {
        Self {
            config,
            grid,
            planner,
            starts: Vec::new(),
            orders: Vec::new(),
            source: NoOrders,
        }
    }
}

impl SimBuilder<AStarPlanner, NoOrders> {
    /// Builder using space-time A* bounded by `config.search`.
    pub fn astar(config: SimConfig, grid: GridMap) -> Self {
        let planner = AStarPlanner::new(config.search);
        Self::new(config, grid, planner)
    }
}

impl<P: PathPlanner, S: OrderSource> SimBuilder<P, S> {
    /// Start cells, one per worker.  `WorkerId(i)` starts on `starts[i]`.
    pub fn workers(mut self, starts: Vec<Cell>) -> Self {
        self.starts = starts;
        self
    }

    /// Orders submitted at tick 0, in the given order.
    pub fn orders(mut self, orders: Vec<OrderRequest>) -> Self {
        self.orders = orders;
        self
    }

    /// Replace the order source polled at the start of every tick.
    pub fn order_source<S2: OrderSource>(self, source: S2) -> SimBuilder<P, S2> {
        SimBuilder {
            config:  self.config,
            grid:    self.grid,
            planner: self.planner,
            starts:  self.starts,
            orders:  self.orders,
            source,
        }
    }

    /// Validate inputs, place workers, queue initial orders, and return a
    /// ready-to-run [`Sim`].
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] for an invalid config, planner search limits
    /// that differ from `config.search`, a map without walkable cells, zero
    /// workers, or a start cell that is not walkable or shared.
    /// [`SimError::Order`] if an initial order is invalid.
    pub fn build(self) -> SimResult<Sim<P, S>> {
        // ── Validate ──────────────────────────────────────────────────────
        self.config.validate().map_err(|e| SimError::Config(e.to_string()))?;
        if let Some(limits) = self.planner.search_limits() {
            if limits != self.config.search {
                return Err(SimError::Config(format!(
                    "planner search limits {limits:?} differ from config.search {:?}",
                    self.config.search
                )));
            }
        }

        if self.grid.walkable_count() == 0 {
            return Err(SimError::Config("map has no walkable cell".into()));
        }
        if self.starts.is_empty() {
            return Err(SimError::Config("at least one worker is required".into()));
        }
        let mut seen = HashSet::with_capacity(self.starts.len());
        for (i, &cell) in self.starts.iter().enumerate() {
            if !self.grid.is_walkable(cell) {
                return Err(SimError::Config(format!("worker {i} starts on non-walkable cell {cell}")));
            }
            if !seen.insert(cell) {
                return Err(SimError::Config(format!("worker {i} shares start cell {cell}")));
            }
        }

        // ── Initial state ─────────────────────────────────────────────────
        let mut state = SimulationState {
            clock:        self.config.make_clock(),
            workers:      WorkerStore::new(&self.starts),
            dispatcher:   OrderDispatcher::new(),
            reservations: ReservationTable::new(),
        };
        for request in self.orders {
            state.dispatcher.submit(request, Tick::ZERO, &self.grid)?;
        }
        state.rebuild_reservations(Tick::ZERO, self.config.reservation_hold);

        debug!(
            workers = state.workers.len(),
            orders = state.dispatcher.book().len(),
            width = self.grid.width(),
            height = self.grid.height(),
            "simulation built"
        );

        Ok(Sim {
            config:  self.config,
            grid:    self.grid,
            planner: self.planner,
            source:  self.source,
            state,
            stop:    StopHandle::new(),
        })
    }
}
