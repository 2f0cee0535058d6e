//! What the stepper reports: per-tick events and the end-of-run summary.

use wh_core::{Cell, OrderId, Tick, WorkerId};
use wh_order::{FailureReason, OrderStatus, OrderTransition};
use wh_worker::{WorkerState, WorkerTransition};

// ── Per tick ──────────────────────────────────────────────────────────────────

/// One worker's committed position at the end of a tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerPosition {
    pub worker: WorkerId,
    pub cell:   Cell,
    pub state:  WorkerState,
}

/// Everything that happened during one tick.
///
/// `positions` holds every worker in ascending id order after the tick's
/// moves were committed.  Transitions are listed in the order they
/// occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickEvent {
    pub tick:               Tick,
    pub positions:          Vec<WorkerPosition>,
    pub order_transitions:  Vec<OrderTransition>,
    pub worker_transitions: Vec<WorkerTransition>,
}

impl TickEvent {
    /// Position of `worker` at the end of the tick.
    pub fn position_of(&self, worker: WorkerId) -> Option<Cell> {
        self.positions.iter().find(|p| p.worker == worker).map(|p| p.cell)
    }

    /// `true` if `worker` entered `state` during this tick.
    pub fn entered(&self, worker: WorkerId, state: WorkerState) -> bool {
        self.worker_transitions.iter().any(|t| t.worker == worker && t.to == state)
    }
}

// ── Run summary ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerSummary {
    pub id:                WorkerId,
    pub distance_traveled: u64,
    pub idle_ticks:        u64,
    pub orders_completed:  u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OrderSummary {
    pub id:           OrderId,
    pub status:       OrderStatus,
    pub created_at:   Tick,
    pub completed_at: Option<Tick>,
    pub failure:      Option<FailureReason>,
}

/// Per-worker and per-order totals at the end of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// First tick that was not simulated.
    pub final_tick:      Tick,
    pub workers:         Vec<WorkerSummary>,
    pub orders:          Vec<OrderSummary>,
    /// Submissions refused as invalid; they never received an id.
    pub rejected_orders: usize,
}

impl RunSummary {
    pub fn count(&self, status: OrderStatus) -> usize {
        self.orders.iter().filter(|o| o.status == status).count()
    }

    pub fn total_distance(&self) -> u64 {
        self.workers.iter().map(|w| w.distance_traveled).sum()
    }

    pub fn total_idle_ticks(&self) -> u64 {
        self.workers.iter().map(|w| w.idle_ticks).sum()
    }

    /// Mean creation-to-completion time over completed orders.
    pub fn mean_lead_time(&self) -> Option<f64> {
        let times: Vec<u64> = self
            .orders
            .iter()
            .filter_map(|o| o.completed_at.map(|t| t.since(o.created_at)))
            .collect();
        if times.is_empty() {
            return None;
        }
        Some(times.iter().sum::<u64>() as f64 / times.len() as f64)
    }
}

/// How a call to `Sim::run` ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub ticks_run:     u64,
    pub final_tick:    Tick,
    /// A stop was requested through the `StopHandle` before the end tick.
    pub stopped_early: bool,
}
