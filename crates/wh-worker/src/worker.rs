//! The per-worker task state machine.
//!
//! ```text
//!          assign            install_path         (path exhausted)
//!   Idle ─────────► Assigned ────────────► MovingToPickup ──► Picking
//!    ▲                                        │    ▲             │
//!    │                                  block │    │ advance     │ finish_picking
//!    │                                        ▼    │             ▼
//!    │                              Blocked { Pickup }    MovingToDelivery ◄─┐
//!    │                                                        │    │         │ advance
//!    │  finish_delivering                      (exhausted)    │    │ block   │
//!    └───────────────────── Delivering ◄──────────────────────┘    ▼         │
//!                                                         Blocked { Delivery }
//! ```
//!
//! Any order-holding state can `fail` back to Idle.  Every method checks the
//! current state and returns [`WorkerError::IllegalTransition`] instead of
//! silently doing something undefined.

use std::fmt;

use tracing::trace;

use wh_core::{Cell, WorkerId};
use wh_order::{Leg, OrderRef};
use wh_plan::Path;

use crate::{WorkerError, WorkerResult};

// ── WorkerState ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorkerState {
    /// No order; eligible for dispatch.
    Idle,
    /// Order bound, no path yet.
    Assigned,
    MovingToPickup,
    /// Loading at the pickup cell.  Lasts within a single tick.
    Picking,
    MovingToDelivery,
    /// Unloading at the delivery cell.  Lasts within a single tick.
    Delivering,
    /// The last requested step was refused; waiting or about to replan.
    Blocked { leg: Leg },
}

impl WorkerState {
    /// The leg being travelled, if any.
    pub fn leg(self) -> Option<Leg> {
        match self {
            WorkerState::Assigned | WorkerState::MovingToPickup => Some(Leg::Pickup),
            WorkerState::MovingToDelivery => Some(Leg::Delivery),
            WorkerState::Blocked { leg } => Some(leg),
            WorkerState::Idle | WorkerState::Picking | WorkerState::Delivering => None,
        }
    }

    #[inline]
    pub fn is_idle(self) -> bool {
        self == WorkerState::Idle
    }

    /// The moving state for `leg`.
    fn moving(leg: Leg) -> WorkerState {
        match leg {
            Leg::Pickup   => WorkerState::MovingToPickup,
            Leg::Delivery => WorkerState::MovingToDelivery,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkerState::Idle             => "idle",
            WorkerState::Assigned         => "assigned",
            WorkerState::MovingToPickup   => "moving_to_pickup",
            WorkerState::Picking          => "picking",
            WorkerState::MovingToDelivery => "moving_to_delivery",
            WorkerState::Delivering       => "delivering",
            WorkerState::Blocked { .. }   => "blocked",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One state change of one worker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerTransition {
    pub worker: WorkerId,
    pub from:   WorkerState,
    pub to:     WorkerState,
}

// ── Worker ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Worker {
    pub id:       WorkerId,
    /// Start cell; the worker's idle home.
    pub home:     Cell,
    pub position: Cell,

    state:         WorkerState,
    current_order: Option<OrderRef>,
    current_path:  Option<Path>,
    /// Index into `current_path` of the cell the worker stands on.
    path_cursor:   usize,

    // ── Counters ──────────────────────────────────────────────────────────
    pub distance_traveled:  u64,
    /// Ticks spent holding an order without moving (blocked or waiting).
    pub idle_ticks:         u64,
    pub orders_completed:   u64,
    pub consecutive_blocks: u32,
    /// Paths discarded after repeated blocks on the current leg.
    pub replans:            u32,

    /// Set by conflict resolution when this idle worker stood in a mover's
    /// way; the stepper plans a one-step side move next tick.
    pub yield_requested: bool,
}

impl Worker {
    pub fn new(id: WorkerId, home: Cell) -> Self {
        Self {
            id,
            home,
            position:           home,
            state:              WorkerState::Idle,
            current_order:      None,
            current_path:       None,
            path_cursor:        0,
            distance_traveled:  0,
            idle_ticks:         0,
            orders_completed:   0,
            consecutive_blocks: 0,
            replans:            0,
            yield_requested:    false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> WorkerState {
        self.state
    }

    #[inline]
    pub fn order(&self) -> Option<&OrderRef> {
        self.current_order.as_ref()
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.current_path.as_ref()
    }

    #[inline]
    pub fn path_cursor(&self) -> usize {
        self.path_cursor
    }

    /// Path cells after the current one, in order.
    pub fn remaining_path(&self) -> &[Cell] {
        match &self.current_path {
            Some(p) => p.cells().get(self.path_cursor + 1..).unwrap_or(&[]),
            None => &[],
        }
    }

    /// The cell this worker wants to occupy next tick, if it is following a
    /// path.  Equal to `position` for a planned wait.
    pub fn next_cell(&self) -> Option<Cell> {
        self.current_path.as_ref()?.get(self.path_cursor + 1)
    }

    /// `true` when the worker stands on the last cell of its path.
    pub fn path_exhausted(&self) -> bool {
        self.current_path.as_ref().is_some_and(|p| self.path_cursor + 1 >= p.len())
    }

    /// Target cell of the current leg.
    pub fn goal(&self) -> Option<Cell> {
        let leg = self.state.leg()?;
        Some(self.current_order?.target(leg))
    }

    /// `true` if the worker holds an order on a travel leg but has no path.
    pub fn needs_path(&self) -> bool {
        self.state.leg().is_some() && self.current_order.is_some() && self.current_path.is_none()
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn illegal(&self, action: &'static str) -> WorkerError {
        WorkerError::IllegalTransition { worker: self.id, from: self.state, action }
    }

    fn set_state(&mut self, to: WorkerState) -> WorkerTransition {
        let from = self.state;
        self.state = to;
        trace!(worker = %self.id, %from, %to, "state change");
        WorkerTransition { worker: self.id, from, to }
    }

    /// Idle → Assigned.
    pub fn assign(&mut self, order: OrderRef) -> WorkerResult<WorkerTransition> {
        if self.state != WorkerState::Idle {
            return Err(self.illegal("assign"));
        }
        self.current_order = Some(order);
        self.current_path = None;
        self.path_cursor = 0;
        self.consecutive_blocks = 0;
        self.replans = 0;
        self.yield_requested = false;
        Ok(self.set_state(WorkerState::Assigned))
    }

    /// Install a freshly planned path starting at the current position.
    ///
    /// Assigned and Blocked workers switch to the moving state of their
    /// leg; an Idle worker accepts a side-step path without changing state.
    pub fn install_path(&mut self, path: Path) -> WorkerResult<Option<WorkerTransition>> {
        if path.start() != self.position {
            return Err(WorkerError::PathMismatch {
                worker:   self.id,
                position: self.position,
                start:    path.start(),
            });
        }
        let next = match self.state {
            WorkerState::Idle => None,
            WorkerState::Assigned => Some(WorkerState::MovingToPickup),
            WorkerState::Blocked { leg } => Some(WorkerState::moving(leg)),
            WorkerState::MovingToPickup | WorkerState::MovingToDelivery => None,
            WorkerState::Picking | WorkerState::Delivering => {
                return Err(self.illegal("install a path"));
            }
        };
        self.current_path = Some(path);
        self.path_cursor = 0;
        Ok(next.map(|s| self.set_state(s)))
    }

    /// Step to the next path cell.  A wait step counts as an idle tick; a
    /// move adds one to `distance_traveled`.  A Blocked worker resumes its
    /// moving state.  An idle side-step path is dropped once finished.
    pub fn advance(&mut self) -> WorkerResult<Option<WorkerTransition>> {
        let Some(next) = self.next_cell() else {
            return Err(self.illegal("advance"));
        };
        if next == self.position {
            if self.current_order.is_some() {
                self.idle_ticks += 1;
            }
        } else {
            self.distance_traveled += 1;
        }
        self.position = next;
        self.path_cursor += 1;
        self.consecutive_blocks = 0;

        if self.state == WorkerState::Idle && self.path_exhausted() {
            self.current_path = None;
            self.path_cursor = 0;
        }
        Ok(match self.state {
            WorkerState::Blocked { leg } => Some(self.set_state(WorkerState::moving(leg))),
            _ => None,
        })
    }

    /// The requested step was refused this tick.
    pub fn block(&mut self) -> WorkerResult<Option<WorkerTransition>> {
        let leg = match self.state {
            WorkerState::MovingToPickup => Leg::Pickup,
            WorkerState::MovingToDelivery => Leg::Delivery,
            WorkerState::Blocked { leg } => leg,
            _ => return Err(self.illegal("block")),
        };
        self.idle_ticks += 1;
        self.consecutive_blocks += 1;
        Ok(match self.state {
            WorkerState::Blocked { .. } => None,
            _ => Some(self.set_state(WorkerState::Blocked { leg })),
        })
    }

    /// Drop the current path so that a new one is planned.  Counts as one
    /// replan.
    pub fn discard_path(&mut self) {
        self.current_path = None;
        self.path_cursor = 0;
        self.consecutive_blocks = 0;
        self.replans += 1;
    }

    /// Hold position for a tick without a path to follow (e.g. planning
    /// found nothing this tick).  Counts as an idle tick while holding an
    /// order.
    pub fn stall(&mut self) {
        if self.current_order.is_some() {
            self.idle_ticks += 1;
        }
    }

    /// Abandon an idle side-step without moving.
    pub fn cancel_yield(&mut self) {
        self.yield_requested = false;
        if self.state == WorkerState::Idle {
            self.current_path = None;
            self.path_cursor = 0;
        }
    }

    /// MovingToPickup with the path exhausted on the pickup cell → Picking.
    pub fn begin_picking(&mut self) -> WorkerResult<WorkerTransition> {
        match (self.state, self.current_order) {
            (WorkerState::MovingToPickup, Some(o)) if o.pickup == self.position => {
                Ok(self.set_state(WorkerState::Picking))
            }
            _ => Err(self.illegal("begin picking")),
        }
    }

    /// Picking → MovingToDelivery, with no path yet and a fresh replan
    /// budget.
    pub fn finish_picking(&mut self) -> WorkerResult<WorkerTransition> {
        if self.state != WorkerState::Picking {
            return Err(self.illegal("finish picking"));
        }
        self.current_path = None;
        self.path_cursor = 0;
        self.consecutive_blocks = 0;
        self.replans = 0;
        Ok(self.set_state(WorkerState::MovingToDelivery))
    }

    /// MovingToDelivery with the path exhausted on the delivery cell →
    /// Delivering.
    pub fn begin_delivering(&mut self) -> WorkerResult<WorkerTransition> {
        match (self.state, self.current_order) {
            (WorkerState::MovingToDelivery, Some(o)) if o.delivery == self.position => {
                Ok(self.set_state(WorkerState::Delivering))
            }
            _ => Err(self.illegal("begin delivering")),
        }
    }

    /// Delivering → Idle.  Releases the order.
    pub fn finish_delivering(&mut self) -> WorkerResult<WorkerTransition> {
        if self.state != WorkerState::Delivering {
            return Err(self.illegal("finish delivering"));
        }
        self.release();
        self.orders_completed += 1;
        Ok(self.set_state(WorkerState::Idle))
    }

    /// Give up the current order and return to Idle where the worker stands.
    pub fn fail(&mut self) -> WorkerResult<WorkerTransition> {
        if self.current_order.is_none() {
            return Err(self.illegal("fail an order"));
        }
        self.release();
        Ok(self.set_state(WorkerState::Idle))
    }

    fn release(&mut self) {
        self.current_order = None;
        self.current_path = None;
        self.path_cursor = 0;
        self.consecutive_blocks = 0;
        self.replans = 0;
    }
}
