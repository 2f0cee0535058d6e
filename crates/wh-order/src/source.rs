//! `OrderSource` — pluggable producers of new orders.
//!
//! The stepper polls its source once at the start of every tick and submits
//! whatever comes back.  Sources only propose requests; validation happens
//! in [`OrderDispatcher::submit`](crate::OrderDispatcher::submit), so an
//! invalid request is rejected and counted, never queued.
//!
//! Randomness lives entirely in sources.  Given the same seed a
//! [`RandomOrderSource`] yields the same request sequence, which keeps whole
//! runs reproducible.

use std::collections::BTreeMap;

use wh_core::{Cell, SimConfig, SimRng, Tick};
use wh_grid::GridMap;

use crate::OrderRequest;

// ── Trait ─────────────────────────────────────────────────────────────────────

pub trait OrderSource {
    /// New requests created at `tick`.
    fn poll(&mut self, tick: Tick, grid: &GridMap) -> Vec<OrderRequest>;
}

/// Produces nothing.  The default source: orders arrive only through
/// explicit submission.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOrders;

impl OrderSource for NoOrders {
    #[inline]
    fn poll(&mut self, _tick: Tick, _grid: &GridMap) -> Vec<OrderRequest> {
        Vec::new()
    }
}

// ── ScheduledOrders ───────────────────────────────────────────────────────────

/// A fixed list of requests, each released at a given tick.
///
/// Requests scheduled for a tick that has already passed are released on the
/// next poll.  Requests sharing a release tick keep their insertion order.
#[derive(Debug, Default, Clone)]
pub struct ScheduledOrders {
    inner: BTreeMap<Tick, Vec<OrderRequest>>,
    total: usize,
}

impl ScheduledOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, release: Tick, request: OrderRequest) {
        self.inner.entry(release).or_default().push(request);
        self.total += 1;
    }

    /// Requests not yet released.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Earliest release tick still queued.
    pub fn next_release(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }
}

impl FromIterator<(Tick, OrderRequest)> for ScheduledOrders {
    fn from_iter<I: IntoIterator<Item = (Tick, OrderRequest)>>(iter: I) -> Self {
        let mut s = Self::new();
        for (tick, req) in iter {
            s.push(tick, req);
        }
        s
    }
}

impl OrderSource for ScheduledOrders {
    fn poll(&mut self, tick: Tick, _grid: &GridMap) -> Vec<OrderRequest> {
        let later = self.inner.split_off(&tick.next());
        let due = std::mem::replace(&mut self.inner, later);
        let out: Vec<OrderRequest> = due.into_values().flatten().collect();
        self.total -= out.len();
        out
    }
}

// ── RandomOrderSource ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct RandomOrderConfig {
    /// Chance that one order arrives in a given tick.
    pub arrival_probability: f64,
    /// Stop producing after this many orders.
    pub max_orders: usize,
    /// Priorities are drawn uniformly from `min_priority..=max_priority`.
    pub min_priority: i32,
    pub max_priority: i32,
}

impl Default for RandomOrderConfig {
    fn default() -> Self {
        Self {
            arrival_probability: 0.1,
            max_orders:          usize::MAX,
            min_priority:        1,
            max_priority:        3,
        }
    }
}

/// Seeded shelf-to-dock order generator for demos and tests.
///
/// Each tick, with probability `arrival_probability`, emits one request
/// from a uniformly chosen shelf to a uniformly chosen dock.  On maps with
/// no shelves or no docks it falls back to random walkable cells.
pub struct RandomOrderSource {
    rng:     SimRng,
    config:  RandomOrderConfig,
    emitted: usize,
    // Lazily filled from the first grid seen.
    pickups: Vec<Cell>,
    drops:   Vec<Cell>,
}

impl RandomOrderSource {
    pub fn new(rng: SimRng, config: RandomOrderConfig) -> Self {
        Self { rng, config, emitted: 0, pickups: Vec::new(), drops: Vec::new() }
    }

    pub fn seeded(seed: u64, config: RandomOrderConfig) -> Self {
        Self::new(SimRng::new(seed), config)
    }

    /// A source seeded from `run.seed`.
    pub fn for_run(run: &SimConfig, config: RandomOrderConfig) -> Self {
        Self::seeded(run.seed, config)
    }

    /// Orders produced so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn load_cells(&mut self, grid: &GridMap) {
        self.pickups = grid.shelves().map(|(_, c)| c).collect();
        self.drops = grid.docks().to_vec();
        if self.pickups.is_empty() || self.drops.is_empty() {
            let all: Vec<Cell> = grid.walkable_cells().collect();
            if self.pickups.is_empty() {
                self.pickups = all.clone();
            }
            if self.drops.is_empty() {
                self.drops = all;
            }
        }
    }
}

impl OrderSource for RandomOrderSource {
    fn poll(&mut self, _tick: Tick, grid: &GridMap) -> Vec<OrderRequest> {
        if self.emitted >= self.config.max_orders
            || !self.rng.gen_bool(self.config.arrival_probability)
        {
            return Vec::new();
        }
        if self.pickups.is_empty() {
            self.load_cells(grid);
        }
        let (Some(&pickup), Some(&delivery)) =
            (self.rng.choose(&self.pickups), self.rng.choose(&self.drops))
        else {
            return Vec::new();
        };
        let (lo, hi) = (self.config.min_priority, self.config.max_priority.max(self.config.min_priority));
        let priority = self.rng.gen_range(lo..=hi);
        self.emitted += 1;
        vec![OrderRequest { pickup, delivery, priority }]
    }
}
