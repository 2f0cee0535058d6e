//! Plain data row types written by output backends.

use wh_core::{OrderId, Tick, WorkerId};
use wh_order::{FailureReason, OrderStatus, OrderTransition};
use wh_sim::{OrderSummary, WorkerPosition, WorkerSummary};
use wh_worker::WorkerTransition;

/// One worker's position at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRow {
    pub tick:      u64,
    pub worker_id: u32,
    pub x:         i32,
    pub y:         i32,
    pub state:     &'static str,
}

impl PositionRow {
    pub fn new(tick: Tick, p: &WorkerPosition) -> Self {
        Self { tick: tick.0, worker_id: p.worker.0, x: p.cell.x, y: p.cell.y, state: p.state.as_str() }
    }
}

/// Which kind of entity a [`TransitionRow`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Order,
    Worker,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionKind::Order  => "order",
            TransitionKind::Worker => "worker",
        }
    }
}

/// A status change of an order or a state change of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRow {
    pub tick: u64,
    pub kind: TransitionKind,
    pub id:   u32,
    /// Empty for a newly created order.
    pub from: &'static str,
    pub to:   &'static str,
}

impl TransitionRow {
    pub fn order(t: &OrderTransition) -> Self {
        Self {
            tick: t.tick.0,
            kind: TransitionKind::Order,
            id:   t.order.0,
            from: t.from.map_or("", OrderStatus::as_str),
            to:   t.to.as_str(),
        }
    }

    pub fn worker(tick: Tick, t: &WorkerTransition) -> Self {
        Self {
            tick: tick.0,
            kind: TransitionKind::Worker,
            id:   t.worker.0,
            from: t.from.as_str(),
            to:   t.to.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummaryRow {
    pub worker_id:         u32,
    pub distance_traveled: u64,
    pub idle_ticks:        u64,
    pub orders_completed:  u64,
}

impl From<&WorkerSummary> for WorkerSummaryRow {
    fn from(w: &WorkerSummary) -> Self {
        let WorkerSummary { id: WorkerId(worker_id), distance_traveled, idle_ticks, orders_completed } = *w;
        Self { worker_id, distance_traveled, idle_ticks, orders_completed }
    }
}

/// Final state of one order.  `completed_at` and `lead_time_secs` are
/// `None` unless the order completed; `failure` is `None` unless it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummaryRow {
    pub order_id:       u32,
    pub status:         &'static str,
    pub created_at:     u64,
    pub completed_at:   Option<u64>,
    pub lead_time_secs: Option<u64>,
    pub failure:        Option<String>,
}

impl OrderSummaryRow {
    /// Build a row, converting the lead time to simulated seconds.
    pub fn new(o: &OrderSummary, tick_duration_secs: u32) -> Self {
        let OrderId(order_id) = o.id;
        Self {
            order_id,
            status:         o.status.as_str(),
            created_at:     o.created_at.0,
            completed_at:   o.completed_at.map(|t| t.0),
            lead_time_secs: o.completed_at.map(|t| t.since(o.created_at) * tick_duration_secs as u64),
            failure:        o.failure.map(|f: FailureReason| f.to_string()),
        }
    }
}

