//! Order records and their status lifecycle.
//!
//! ```text
//! Pending ─► Assigned ─► InProgress ─► Completed
//!    │           │            │
//!    └───────────┴────────────┴──────► Failed
//! ```
//!
//! Completed and Failed are terminal.  Terminal orders stay in the ledger
//! for reporting.

use std::fmt;

use wh_core::{Cell, OrderId, Tick, WorkerId};

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Failed,
}

impl OrderStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }

    /// Whether `self → next` is a legal lifecycle step.
    pub fn can_become(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Assigned)
                | (Assigned, InProgress)
                | (InProgress, Completed)
                | (Pending | Assigned | InProgress, Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending    => "pending",
            OrderStatus::Assigned   => "assigned",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed  => "completed",
            OrderStatus::Failed     => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Legs and failures ─────────────────────────────────────────────────────────

/// Which half of an order a worker is travelling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Leg {
    Pickup,
    Delivery,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Leg::Pickup   => "pickup",
            Leg::Delivery => "delivery",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureReason {
    /// The planner found no path for this leg.
    Unreachable { leg: Leg },
    /// The worker was blocked into replanning too often on this leg.
    ReplanBudgetExhausted { leg: Leg },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Unreachable { leg } => write!(f, "{leg} unreachable"),
            FailureReason::ReplanBudgetExhausted { leg } => {
                write!(f, "replan budget exhausted on {leg}")
            }
        }
    }
}

// ── Requests and records ──────────────────────────────────────────────────────

/// What an order source or caller submits.  Becomes an [`Order`] once the
/// dispatcher accepts it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderRequest {
    pub pickup:   Cell,
    pub delivery: Cell,
    /// Higher is served first.
    pub priority: i32,
}

impl OrderRequest {
    pub fn new(pickup: Cell, delivery: Cell) -> Self {
        Self { pickup, delivery, priority: 0 }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub id:           OrderId,
    pub pickup:       Cell,
    pub delivery:     Cell,
    pub priority:     i32,
    pub status:       OrderStatus,
    pub created_at:   Tick,
    pub assigned_to:  Option<WorkerId>,
    pub completed_at: Option<Tick>,
    pub failed_at:    Option<Tick>,
    pub failure:      Option<FailureReason>,
}

impl Order {
    pub fn new(id: OrderId, request: OrderRequest, created_at: Tick) -> Self {
        Self {
            id,
            pickup:       request.pickup,
            delivery:     request.delivery,
            priority:     request.priority,
            status:       OrderStatus::Pending,
            created_at,
            assigned_to:  None,
            completed_at: None,
            failed_at:    None,
            failure:      None,
        }
    }

    /// The lightweight handle a worker carries while serving this order.
    pub fn handle(&self) -> OrderRef {
        OrderRef { id: self.id, pickup: self.pickup, delivery: self.delivery }
    }

    /// Ticks from creation to completion, if completed.
    pub fn lead_time(&self) -> Option<u64> {
        self.completed_at.map(|t| t.since(self.created_at))
    }
}

/// A worker's reference to its active order.  The ledger keeps the record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderRef {
    pub id:       OrderId,
    pub pickup:   Cell,
    pub delivery: Cell,
}

impl OrderRef {
    /// Target cell of `leg`.
    #[inline]
    pub fn target(&self, leg: Leg) -> Cell {
        match leg {
            Leg::Pickup   => self.pickup,
            Leg::Delivery => self.delivery,
        }
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

/// One status change, as reported in the tick event stream.
///
/// `from` is `None` when the order was created this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderTransition {
    pub tick:  Tick,
    pub order: OrderId,
    pub from:  Option<OrderStatus>,
    pub to:    OrderStatus,
}
